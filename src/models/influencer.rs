// src/models/influencer.rs
// DOCUMENTATION: Influencer records and their API representations
// PURPOSE: Database row, admin create request, and listing/detail DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::services::image_url::{proxy_image_url, PLACEHOLDER_THUMB};
use crate::services::price_range::BadgeTier;
use crate::services::reel_embed::reel_embed_url;

/// Influencer as stored in the influencers table
/// DOCUMENTATION: Most descriptive fields are optional because records are curated by hand
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Influencer {
    pub id: Uuid,
    pub name: Option<String>,
    pub username: Option<String>,
    pub category: Option<String>,
    /// Display string such as "125K"
    pub followers: Option<String>,
    pub engagement: Option<String>,
    pub instagram_url: Option<String>,
    pub profile_image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// JSON list of reels, items are either strings or `{url, views, likes, date}` objects
    pub reels: Value,
    /// Brand front profiles are always listed first
    pub brand_front: bool,
    pub created_at: DateTime<Utc>,
}

/// Single reel attached to an influencer profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelItem {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Embeddable player URL when the reel is an Instagram link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
}

/// Request to create an influencer (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInfluencerRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 64))]
    pub username: Option<String>,
    #[validate(length(max = 80))]
    pub category: Option<String>,
    pub followers: Option<String>,
    pub engagement: Option<String>,
    #[validate(url)]
    pub instagram_url: Option<String>,
    #[validate(url)]
    pub profile_image_url: Option<String>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub reels: Vec<Value>,
    #[serde(default)]
    pub brand_front: bool,
}

/// Influencer DTO exposed via API
#[derive(Debug, Clone, Serialize)]
pub struct InfluencerResponse {
    pub id: Uuid,
    pub name: String,
    pub handle: String,
    pub avatar: String,
    pub thumbnail: String,
    pub category: String,
    pub followers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    pub reels: Vec<ReelItem>,
    pub brand_front: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_price_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_price_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_badge: Option<BadgeTier>,
    /// Avatar routed through wsrv.nl for hotlink-protected hosts
    pub avatar_proxied: String,
}

/// Query parameters for the influencer listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfluencerListQuery {
    /// Case-insensitive match on name, handle or category
    pub q: Option<String>,
    /// rating | reviews | name-az | name-za | price-desc | price-asc
    pub sort: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Normalise the stored reels JSON into typed items
/// Plain strings become `{url}`, objects need a string `url`, anything else is dropped.
pub fn normalize_reels(data: &Value) -> Vec<ReelItem> {
    let Some(items) = data.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let (url, views, likes, date) = match item {
                Value::String(s) if !s.trim().is_empty() => (s.trim().to_string(), None, None, None),
                Value::Object(obj) => {
                    let url = obj.get("url")?.as_str()?.trim().to_string();
                    (
                        url,
                        obj.get("views").and_then(Value::as_i64),
                        obj.get("likes").and_then(Value::as_i64),
                        obj.get("date").and_then(Value::as_str).map(str::to_string),
                    )
                }
                _ => return None,
            };
            if url.is_empty() {
                return None;
            }
            let embed_url = reel_embed_url(&url);
            Some(ReelItem {
                url,
                views,
                likes,
                date,
                embed_url,
            })
        })
        .collect()
}

impl Influencer {
    /// Display name, falls back to a placeholder for unnamed records
    pub fn display_name(&self) -> String {
        non_blank(&self.name).unwrap_or("İsimsiz").to_string()
    }

    /// `@username`, or the lowercased name without whitespace when no username is set
    pub fn handle(&self) -> String {
        let name = self.display_name();
        let handle = match non_blank(&self.username) {
            Some(username) => username.to_string(),
            None => name.to_lowercase().split_whitespace().collect::<String>(),
        };

        if handle.is_empty() {
            name
        } else if handle.starts_with('@') {
            handle
        } else {
            format!("@{}", handle)
        }
    }

    /// Profile image, or a deterministic pravatar image keyed by id
    pub fn avatar(&self) -> String {
        non_blank(&self.profile_image_url)
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://i.pravatar.cc/150?u={}", self.id))
    }

    /// Convert database Influencer into API response without review statistics
    pub fn to_response(&self) -> InfluencerResponse {
        let avatar = self.avatar();
        InfluencerResponse {
            id: self.id,
            name: self.display_name(),
            handle: self.handle(),
            avatar_proxied: proxy_image_url(Some(&avatar)),
            avatar,
            thumbnail: non_blank(&self.thumbnail_url)
                .or_else(|| non_blank(&self.profile_image_url))
                .unwrap_or(PLACEHOLDER_THUMB)
                .to_string(),
            category: non_blank(&self.category).unwrap_or("—").to_string(),
            followers: non_blank(&self.followers).unwrap_or("—").to_string(),
            engagement: non_blank(&self.engagement).map(str::to_string),
            instagram_url: non_blank(&self.instagram_url).map(str::to_string),
            reels: normalize_reels(&self.reels),
            brand_front: self.brand_front,
            avg_rating: None,
            review_count: None,
            estimated_price_range: None,
            estimated_price_label: None,
            price_badge: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn influencer(name: Option<&str>, username: Option<&str>) -> Influencer {
        Influencer {
            id: Uuid::nil(),
            name: name.map(str::to_string),
            username: username.map(str::to_string),
            category: None,
            followers: None,
            engagement: None,
            instagram_url: None,
            profile_image_url: None,
            thumbnail_url: None,
            reels: json!([]),
            brand_front: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_handle_from_username() {
        assert_eq!(influencer(Some("Ayşe"), Some("ayse.cooks")).handle(), "@ayse.cooks");
        assert_eq!(influencer(Some("Ayşe"), Some("@ayse")).handle(), "@ayse");
    }

    #[test]
    fn test_handle_from_name() {
        assert_eq!(influencer(Some("Mehmet Can Yılmaz"), None).handle(), "@mehmetcanyılmaz");
        let unnamed = influencer(None, None).handle();
        assert!(unnamed.starts_with('@'));
        assert!(unnamed.ends_with("simsiz"));
    }

    #[test]
    fn test_defaults_in_response() {
        let inf = influencer(None, None);
        let resp = inf.to_response();
        assert_eq!(resp.name, "İsimsiz");
        assert_eq!(resp.category, "—");
        assert_eq!(resp.followers, "—");
        assert_eq!(
            resp.avatar,
            "https://i.pravatar.cc/150?u=00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(resp.thumbnail, PLACEHOLDER_THUMB);
    }

    #[test]
    fn test_thumbnail_falls_back_to_profile_image() {
        let mut inf = influencer(Some("Zeynep"), None);
        inf.profile_image_url = Some("https://unavatar.io/instagram/zeynep".to_string());
        assert_eq!(
            inf.to_response().thumbnail,
            "https://unavatar.io/instagram/zeynep"
        );
    }

    #[test]
    fn test_normalize_reels() {
        let reels = normalize_reels(&json!([
            " https://www.instagram.com/reel/Cabcdefgh12/ ",
            { "url": "https://example.com/video", "views": 1200, "likes": 40 },
            { "views": 3 },
            "",
            42
        ]));

        assert_eq!(reels.len(), 2);
        assert_eq!(reels[0].url, "https://www.instagram.com/reel/Cabcdefgh12/");
        assert_eq!(
            reels[0].embed_url.as_deref(),
            Some("https://www.instagram.com/reel/Cabcdefgh12/embed/")
        );
        assert_eq!(reels[1].views, Some(1200));
        assert!(reels[1].embed_url.is_none());
    }

    #[test]
    fn test_normalize_reels_not_array() {
        assert!(normalize_reels(&json!({ "url": "x" })).is_empty());
        assert!(normalize_reels(&Value::Null).is_empty());
    }
}
