// src/services/reel_embed.rs
// DOCUMENTATION: Instagram reel link handling
// PURPOSE: Turn reel links into embeddable player URLs

use once_cell::sync::Lazy;
use regex::Regex;

static REEL_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/reels?/([A-Za-z0-9_-]{8,})").expect("valid reel regex"));
static INSTAGRAM_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)instagram|instagr\.am").expect("valid host regex"));
static REEL_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/reels?/").expect("valid segment regex"));
static SHORTCODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid shortcode regex"));

fn embed_for(shortcode: &str) -> String {
    format!("https://www.instagram.com/reel/{}/embed/", shortcode)
}

/// Embed URL for a reel link, `None` when the link is not a recognisable reel
pub fn reel_embed_url(reel_url: &str) -> Option<String> {
    let trimmed = reel_url.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(caps) = REEL_PATH.captures(trimmed) {
        return Some(embed_for(&caps[1]));
    }

    // Short shortcodes on instagram links
    if INSTAGRAM_HOST.is_match(trimmed) {
        let slug = trimmed
            .split_once("/reel/")
            .or_else(|| trimmed.split_once("/reels/"))
            .map(|(_, rest)| rest)?;
        let shortcode = slug
            .split('/')
            .next()
            .and_then(|s| s.split('?').next())
            .and_then(|s| s.split('#').next())
            .unwrap_or("")
            .trim();
        if !shortcode.is_empty() && SHORTCODE.is_match(shortcode) {
            return Some(embed_for(shortcode));
        }
    }

    None
}

pub fn is_instagram_reel_url(url: &str) -> bool {
    let u = url.trim();
    INSTAGRAM_HOST.is_match(u) && REEL_SEGMENT.is_match(u)
}
