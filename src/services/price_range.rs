// src/services/price_range.rs
// DOCUMENTATION: Price band catalogue for influencer collaborations
// PURPOSE: Validate review price ranges and estimate a band from many reviews

use serde::Serialize;

/// A selectable collaboration price band (TL per reel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRangeOption {
    pub value: &'static str,
    pub label: &'static str,
    pub short_label: &'static str,
    /// Midpoint used for averaging and sorting
    pub midpoint: u32,
    pub tier: BadgeTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Green,
    Yellow,
    Red,
}

pub const PRICE_RANGE_OPTIONS: [PriceRangeOption; 5] = [
    PriceRangeOption {
        value: "1000-3000",
        label: "1.000-3.000 TL / reels",
        short_label: "1.000-3.000 TL",
        midpoint: 2000,
        tier: BadgeTier::Green,
    },
    PriceRangeOption {
        value: "3000-5000",
        label: "3.000-5.000 TL / reels",
        short_label: "3.000-5.000 TL",
        midpoint: 4000,
        tier: BadgeTier::Green,
    },
    PriceRangeOption {
        value: "5000-8000",
        label: "5.000-8.000 TL / reels",
        short_label: "5.000-8.000 TL",
        midpoint: 6500,
        tier: BadgeTier::Yellow,
    },
    PriceRangeOption {
        value: "8000-10000",
        label: "8.000-10.000 TL / reels",
        short_label: "8.000-10.000 TL",
        midpoint: 9000,
        tier: BadgeTier::Red,
    },
    PriceRangeOption {
        value: "10000+",
        label: "10.000 TL+ / reels",
        short_label: "10.000 TL+",
        midpoint: 12000,
        tier: BadgeTier::Red,
    },
];

pub fn find_option(value: &str) -> Option<&'static PriceRangeOption> {
    let value = value.trim();
    PRICE_RANGE_OPTIONS.iter().find(|o| o.value == value)
}

pub fn is_known(value: &str) -> bool {
    find_option(value).is_some()
}

/// Short label for cards, unknown values are echoed back
pub fn short_label(value: &str) -> String {
    find_option(value)
        .map(|o| o.short_label.to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Badge colour; anything unknown is yellow
pub fn badge_tier(value: &str) -> BadgeTier {
    find_option(value).map(|o| o.tier).unwrap_or(BadgeTier::Yellow)
}

/// Numeric sort key, 0 puts missing or unknown ranges last in descending order
pub fn sort_value(estimated: Option<&str>) -> u32 {
    estimated.and_then(find_option).map(|o| o.midpoint).unwrap_or(0)
}

/// Band boundaries: 2.5K, 5.25K, 7.75K, 10.5K
fn average_to_nearest_band(average: f64) -> &'static str {
    if average < 2500.0 {
        "1000-3000"
    } else if average < 5250.0 {
        "3000-5000"
    } else if average < 7750.0 {
        "5000-8000"
    } else if average < 10500.0 {
        "8000-10000"
    } else {
        "10000+"
    }
}

/// Average the midpoints of every known range and snap to the nearest band
/// e.g. 1000-3000 and 8000-10000 average to 5500, which lands in 5000-8000
pub fn estimated_from_reviews<'a, I>(ranges: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let midpoints: Vec<f64> = ranges
        .into_iter()
        .filter_map(find_option)
        .map(|o| o.midpoint as f64)
        .collect();

    if midpoints.is_empty() {
        return None;
    }

    let average = midpoints.iter().sum::<f64>() / midpoints.len() as f64;
    Some(average_to_nearest_band(average).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_mixed_ranges() {
        assert_eq!(
            estimated_from_reviews(["1000-3000", "8000-10000"]),
            Some("5000-8000".to_string())
        );
    }

    #[test]
    fn test_estimate_ignores_unknown_and_blank() {
        assert_eq!(
            estimated_from_reviews(["", "  ", "cheap", " 10000+ "]),
            Some("10000+".to_string())
        );
        assert_eq!(estimated_from_reviews(["", "cheap"]), None);
        assert_eq!(estimated_from_reviews(Vec::<&str>::new()), None);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(average_to_nearest_band(2499.0), "1000-3000");
        assert_eq!(average_to_nearest_band(2500.0), "3000-5000");
        assert_eq!(average_to_nearest_band(5250.0), "5000-8000");
        assert_eq!(average_to_nearest_band(7750.0), "8000-10000");
        assert_eq!(average_to_nearest_band(10500.0), "10000+");
    }

    #[test]
    fn test_labels_and_tiers() {
        assert_eq!(short_label("8000-10000"), "8.000-10.000 TL");
        assert_eq!(short_label("mystery"), "mystery");
        assert_eq!(badge_tier("3000-5000"), BadgeTier::Green);
        assert_eq!(badge_tier("5000-8000"), BadgeTier::Yellow);
        assert_eq!(badge_tier("10000+"), BadgeTier::Red);
        assert_eq!(badge_tier(""), BadgeTier::Yellow);
    }

    #[test]
    fn test_sort_value() {
        assert_eq!(sort_value(Some("5000-8000")), 6500);
        assert_eq!(sort_value(Some("nope")), 0);
        assert_eq!(sort_value(None), 0);
    }
}
