// src/services/influencer_service.rs
// DOCUMENTATION: Business logic for influencer profiles
// PURPOSE: Joins profiles with review aggregates and applies search and sorting

use crate::db::{InfluencerRepository, ReviewRepository, ReviewStats};
use crate::errors::AppError;
use crate::models::{CreateInfluencerRequest, InfluencerListQuery, InfluencerResponse};
use crate::services::price_range;
use crate::services::reel_embed::is_instagram_reel_url;
use sqlx::PgPool;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Listing order requested by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingSort {
    /// Brand front first, then newest
    Default,
    Rating,
    Reviews,
    NameAsc,
    NameDesc,
    PriceDesc,
    PriceAsc,
}

impl ListingSort {
    /// Unknown values keep the default order
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("rating") => ListingSort::Rating,
            Some("reviews") => ListingSort::Reviews,
            Some("name-az") => ListingSort::NameAsc,
            Some("name-za") => ListingSort::NameDesc,
            Some("price-desc") => ListingSort::PriceDesc,
            Some("price-asc") => ListingSort::PriceAsc,
            _ => ListingSort::Default,
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fill rating, review count and estimated price range from aggregates
pub fn apply_stats(response: &mut InfluencerResponse, stats: Option<&ReviewStats>) {
    let (avg, count, estimate) = match stats {
        Some(s) => (
            s.avg_stars.map(round_one_decimal).unwrap_or(0.0),
            s.review_count,
            s.price_ranges
                .as_ref()
                .and_then(|r| price_range::estimated_from_reviews(r.iter().map(String::as_str))),
        ),
        None => (0.0, 0, None),
    };
    response.avg_rating = Some(avg);
    response.review_count = Some(count);
    response.estimated_price_label = estimate.as_deref().map(price_range::short_label);
    response.price_badge = estimate.as_deref().map(price_range::badge_tier);
    response.estimated_price_range = estimate;
}

fn matches_search(item: &InfluencerResponse, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item.handle.to_lowercase().contains(needle)
        || item.category.to_lowercase().contains(needle)
}

/// Turkish alphabet plus q, w and x in their Latin positions
const TURKISH_ORDER: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";

fn turkish_lower(c: char) -> char {
    match c {
        'I' => 'ı',
        'İ' => 'i',
        _ => c.to_lowercase().next().unwrap_or(c),
    }
}

/// Collation key: symbols and digits first, then letters in Turkish order,
/// then any other letter by code point
fn collation_key(name: &str) -> Vec<(u8, u32)> {
    name.chars()
        .map(turkish_lower)
        .map(|c| match TURKISH_ORDER.chars().position(|t| t == c) {
            Some(rank) => (1, rank as u32),
            None if c.is_alphabetic() => (2, c as u32),
            None => (0, c as u32),
        })
        .collect()
}

fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Filter by `q` and reorder by `sort`
/// DOCUMENTATION: Input is expected in default order. All sorts are stable so
/// ties keep brand front and recency ordering.
pub fn filter_and_sort(
    mut items: Vec<InfluencerResponse>,
    q: Option<&str>,
    sort: ListingSort,
) -> Vec<InfluencerResponse> {
    if let Some(needle) = q.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()) {
        items.retain(|i| matches_search(i, &needle));
    }

    let rating = |i: &InfluencerResponse| i.avg_rating.unwrap_or(0.0);
    let reviews = |i: &InfluencerResponse| i.review_count.unwrap_or(0);
    let price = |i: &InfluencerResponse| price_range::sort_value(i.estimated_price_range.as_deref());

    match sort {
        ListingSort::Default => {}
        ListingSort::Rating => items.sort_by(|a, b| rating(b).total_cmp(&rating(a))),
        ListingSort::Reviews => items.sort_by_key(|i| std::cmp::Reverse(reviews(i))),
        ListingSort::NameAsc => items.sort_by(|a, b| compare_names(&a.name, &b.name)),
        ListingSort::NameDesc => items.sort_by(|a, b| compare_names(&b.name, &a.name)),
        ListingSort::PriceDesc => items.sort_by_key(|i| std::cmp::Reverse(price(i))),
        ListingSort::PriceAsc => items.sort_by_key(price),
    }
    items
}

pub struct InfluencerService;

impl InfluencerService {
    /// List influencers with review aggregates
    pub async fn list(
        pool: &PgPool,
        query: &InfluencerListQuery,
    ) -> Result<Vec<InfluencerResponse>, AppError> {
        let influencers = InfluencerRepository::list_all(pool).await?;
        let stats: HashMap<Uuid, ReviewStats> = ReviewRepository::get_stats_for_all(pool)
            .await?
            .into_iter()
            .map(|s| (s.influencer_id, s))
            .collect();

        let items = influencers
            .iter()
            .map(|inf| {
                let mut response = inf.to_response();
                apply_stats(&mut response, stats.get(&inf.id));
                response
            })
            .collect();

        Ok(filter_and_sort(
            items,
            query.q.as_deref(),
            ListingSort::parse(query.sort.as_deref()),
        ))
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<InfluencerResponse, AppError> {
        let influencer = InfluencerRepository::get_by_id(pool, id).await?;
        let stats = ReviewRepository::get_stats_for_all(pool)
            .await?
            .into_iter()
            .find(|s| s.influencer_id == id);

        let mut response = influencer.to_response();
        apply_stats(&mut response, stats.as_ref());
        Ok(response)
    }

    pub async fn create(
        pool: &PgPool,
        req: &CreateInfluencerRequest,
    ) -> Result<InfluencerResponse, AppError> {
        for reel in &req.reels {
            let url = reel
                .as_str()
                .or_else(|| reel.get("url").and_then(|u| u.as_str()))
                .unwrap_or("");
            if !is_instagram_reel_url(url) {
                log::warn!("Reel {:?} is not an Instagram reel link, it will have no embed", url);
            }
        }

        let influencer = InfluencerRepository::create(pool, req).await?;
        log::info!("Created influencer {} ({})", influencer.display_name(), influencer.id);

        let mut response = influencer.to_response();
        apply_stats(&mut response, None);
        Ok(response)
    }

    /// Reviews and their votes go with it, reports are kept for the audit trail
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        InfluencerRepository::delete(pool, id).await?;
        log::info!("Deleted influencer {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, category: &str, rating: f64, reviews: i64, price: Option<&str>) -> InfluencerResponse {
        InfluencerResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            handle: format!("@{}", name.to_lowercase()),
            avatar: String::new(),
            avatar_proxied: String::new(),
            thumbnail: String::new(),
            category: category.to_string(),
            followers: "—".to_string(),
            engagement: None,
            instagram_url: None,
            reels: Vec::new(),
            brand_front: false,
            avg_rating: Some(rating),
            review_count: Some(reviews),
            estimated_price_range: price.map(str::to_string),
            estimated_price_label: None,
            price_badge: None,
        }
    }

    fn names(items: &[InfluencerResponse]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    fn sample() -> Vec<InfluencerResponse> {
        vec![
            item("Zeynep", "Food", 4.5, 3, Some("3000-5000")),
            item("Ali", "Travel", 3.0, 10, None),
            item("Mert", "Food", 4.5, 1, Some("10000+")),
        ]
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(ListingSort::parse(Some("rating")), ListingSort::Rating);
        assert_eq!(ListingSort::parse(Some("price-asc")), ListingSort::PriceAsc);
        assert_eq!(ListingSort::parse(Some("bogus")), ListingSort::Default);
        assert_eq!(ListingSort::parse(None), ListingSort::Default);
    }

    #[test]
    fn test_rating_sort_is_stable() {
        let sorted = filter_and_sort(sample(), None, ListingSort::Rating);
        assert_eq!(names(&sorted), vec!["Zeynep", "Mert", "Ali"]);
    }

    #[test]
    fn test_other_sorts() {
        assert_eq!(
            names(&filter_and_sort(sample(), None, ListingSort::Reviews)),
            vec!["Ali", "Zeynep", "Mert"]
        );
        assert_eq!(
            names(&filter_and_sort(sample(), None, ListingSort::NameAsc)),
            vec!["Ali", "Mert", "Zeynep"]
        );
        assert_eq!(
            names(&filter_and_sort(sample(), None, ListingSort::NameDesc)),
            vec!["Zeynep", "Mert", "Ali"]
        );
        assert_eq!(
            names(&filter_and_sort(sample(), None, ListingSort::PriceDesc)),
            vec!["Mert", "Zeynep", "Ali"]
        );
        assert_eq!(
            names(&filter_and_sort(sample(), None, ListingSort::PriceAsc)),
            vec!["Ali", "Zeynep", "Mert"]
        );
    }

    #[test]
    fn test_name_sort_follows_turkish_alphabet() {
        let items = ["Zeynep", "Çağla", "Ali", "Şule", "Ömer"]
            .into_iter()
            .map(|n| item(n, "Food", 0.0, 0, None))
            .collect::<Vec<_>>();

        let sorted = filter_and_sort(items.clone(), None, ListingSort::NameAsc);
        assert_eq!(names(&sorted), vec!["Ali", "Çağla", "Ömer", "Şule", "Zeynep"]);

        let sorted = filter_and_sort(items, None, ListingSort::NameDesc);
        assert_eq!(names(&sorted), vec!["Zeynep", "Şule", "Ömer", "Çağla", "Ali"]);
    }

    #[test]
    fn test_dotted_and_dotless_i() {
        let items = ["İrem", "Hakan", "Ilgın", "Gül", "Göksu"]
            .into_iter()
            .map(|n| item(n, "Food", 0.0, 0, None))
            .collect::<Vec<_>>();

        let sorted = filter_and_sort(items, None, ListingSort::NameAsc);
        assert_eq!(names(&sorted), vec!["Göksu", "Gül", "Hakan", "Ilgın", "İrem"]);
    }

    #[test]
    fn test_search_matches_name_handle_category() {
        assert_eq!(names(&filter_and_sort(sample(), Some(" food "), ListingSort::Default)), vec!["Zeynep", "Mert"]);
        assert_eq!(names(&filter_and_sort(sample(), Some("@al"), ListingSort::Default)), vec!["Ali"]);
        assert_eq!(filter_and_sort(sample(), Some("   "), ListingSort::Default).len(), 3);
    }

    #[test]
    fn test_apply_stats() {
        let mut response = item("A", "x", 0.0, 0, None);
        let stats = ReviewStats {
            influencer_id: response.id,
            review_count: 3,
            avg_stars: Some(4.3333),
            price_ranges: Some(vec!["1000-3000".into(), "8000-10000".into()]),
        };
        apply_stats(&mut response, Some(&stats));
        assert_eq!(response.avg_rating, Some(4.3));
        assert_eq!(response.review_count, Some(3));
        assert_eq!(response.estimated_price_range.as_deref(), Some("5000-8000"));
        assert_eq!(response.estimated_price_label.as_deref(), Some("5.000-8.000 TL"));
        assert_eq!(response.price_badge, Some(price_range::BadgeTier::Yellow));

        apply_stats(&mut response, None);
        assert_eq!(response.avg_rating, Some(0.0));
        assert_eq!(response.review_count, Some(0));
        assert_eq!(response.estimated_price_range, None);
        assert_eq!(response.price_badge, None);
    }
}
