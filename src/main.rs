// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, shared services, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::middleware::{Compress, DefaultHeaders, Logger};
use actix_web::{web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{start_cleanup_task, start_prune_task, ImageCache, ImageProxyClient, WriteLimiter};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", config.log_filter());
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting kimgetirdi service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );
    log::info!("Day boundary offset: UTC{:+}", config.day_offset_hours);

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Image proxy with its in-memory cache
    let cache = Arc::new(ImageCache::new(
        config.image_cache_ttl,
        config.image_cache_max_bytes(),
    ));
    start_cleanup_task(cache.clone(), 300);
    log::info!(
        "Initialized image cache (TTL: {}s, budget: {} MiB, cleanup every 5 minutes)",
        config.image_cache_ttl,
        config.image_cache_max_mb
    );

    let image_client = match ImageProxyClient::new(config.image_fetch_timeout) {
        Ok(client) => web::Data::new(client.with_cache(cache.clone())),
        Err(e) => {
            log::error!("Failed to build image proxy client: {}", e);
            std::process::exit(1);
        }
    };

    // 6. Per-device write limiter
    let limiter = Arc::new(WriteLimiter::per_minute(config.write_rate_per_minute));
    start_prune_task(limiter.clone(), 600);
    log::info!(
        "Write rate limit: {} requests per device per minute",
        config.write_rate_per_minute
    );

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .app_data(image_client.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Referrer-Policy", "no-referrer")))
            // Extractor errors use the AppError body
            .configure(handlers::extract_config)
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::image_config)
            .configure(handlers::influencers_config)
            .configure(handlers::reviews_config)
            .configure(handlers::votes_config)
            .configure(handlers::visits_config)
            .configure(handlers::contact_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
