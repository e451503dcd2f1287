// src/bin/seed.rs
// Loads influencer profiles from a JSON file into a running service via the admin API.
//
// Usage: cargo run --bin seed -- influencers.json
// Env:   ADMIN_TOKEN (required), KIMGETIRDI_API_URL (default http://localhost:8080)

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::env;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Deserialize, Debug)]
struct CreatedInfluencer {
    id: String,
    handle: String,
}

#[derive(Debug)]
struct SeedResult {
    name: String,
    outcome: Result<CreatedInfluencer, String>,
    duration_secs: f64,
}

struct Seeder {
    base_url: String,
    admin_token: String,
    client: Client,
    results: Vec<SeedResult>,
}

/// Name used in progress lines, also for entries the server will reject
fn entry_name(entry: &Value) -> String {
    entry
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("(unnamed)")
        .to_string()
}

/// Accepts either a bare array or `{"influencers": [...]}`
fn parse_entries(raw: &str) -> Result<Vec<Value>> {
    let data: Value = serde_json::from_str(raw).context("seed file is not valid JSON")?;
    match data {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("influencers") {
            Some(Value::Array(items)) => Ok(items),
            _ => bail!("expected an array or an object with an \"influencers\" array"),
        },
        _ => bail!("expected an array or an object with an \"influencers\" array"),
    }
}

impl Seeder {
    fn new(base_url: String, admin_token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_token,
            client,
            results: Vec::new(),
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn create_influencer(&self, entry: &Value) -> Result<CreatedInfluencer, String> {
        let response = self
            .client
            .post(format!("{}/admin/influencers", self.base_url))
            .header("X-Admin-Token", &self.admin_token)
            .json(entry)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            response
                .json::<CreatedInfluencer>()
                .await
                .map_err(|e| format!("Failed to parse response JSON: {}", e))
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(format!("HTTP {} - {}", status, body))
        }
    }

    async fn run(&mut self, entries: &[Value]) {
        println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
        if !self.check_service_health().await {
            println!("{}❌ Service unavailable at {}.{}", RED, self.base_url, RESET);
            println!("{}Start it first with `cargo run`{}", YELLOW, RESET);
            process::exit(1);
        }
        println!("{}✅ Service available{}\n", GREEN, RESET);
        println!("{}📊 Influencers to create: {}{}\n", BOLD, entries.len(), RESET);

        let total = entries.len();
        for (i, entry) in entries.iter().enumerate() {
            let name = entry_name(entry);
            let start = Instant::now();
            let outcome = self.create_influencer(entry).await;
            let duration_secs = start.elapsed().as_secs_f64();

            match &outcome {
                Ok(created) => println!(
                    "{}[{}/{}] ✅ {} {} ({}){}",
                    GREEN,
                    i + 1,
                    total,
                    name,
                    created.handle,
                    created.id,
                    RESET
                ),
                Err(err) => println!("{}[{}/{}] ❌ {}: {}{}", RED, i + 1, total, name, err, RESET),
            }

            self.results.push(SeedResult {
                name,
                outcome,
                duration_secs,
            });
        }

        self.print_summary();
    }

    fn print_summary(&self) {
        println!("\n{}📋 Seed Summary{}", BOLD, RESET);
        println!("──────────────────────────────────────────────────────────────");
        println!("{:<40} {:<8} {:>10}", "Influencer", "Status", "Duration");
        println!("──────────────────────────────────────────────────────────────");

        for res in &self.results {
            let status = if res.outcome.is_ok() { "✅" } else { "❌" };
            println!("{:<40} {:<8} {:>9.2}s", res.name, status, res.duration_secs);
        }

        let created = self.results.iter().filter(|r| r.outcome.is_ok()).count();
        let failed = self.results.len() - created;

        println!("──────────────────────────────────────────────────────────────");
        println!("  • Created: {}{}{}", GREEN, created, RESET);
        println!("  • Failed:  {}{}{}", if failed > 0 { RED } else { GREEN }, failed, RESET);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let path = env::args()
        .nth(1)
        .context("usage: seed <influencers.json>")?;
    let admin_token = env::var("ADMIN_TOKEN").context("ADMIN_TOKEN must be set in .env")?;
    let base_url =
        env::var("KIMGETIRDI_API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());

    let raw = std::fs::read_to_string(&path).with_context(|| format!("cannot read {}", path))?;
    let entries = parse_entries(&raw)?;
    if entries.is_empty() {
        println!("{}⚠️  {} contains no influencers{}", YELLOW, path, RESET);
        return Ok(());
    }

    let mut seeder = Seeder::new(base_url, admin_token)?;
    seeder.run(&entries).await;
    Ok(())
}
