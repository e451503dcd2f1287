// src/services/day_key.rs
// DOCUMENTATION: Local calendar day keys
// PURPOSE: Visit counters and the daily review throttle both bucket by local day

use chrono::{DateTime, FixedOffset, Offset, Utc};
use uuid::Uuid;

/// YYYY-MM-DD of `now` shifted by `offset_hours`
/// Out-of-range offsets fall back to UTC; Config::validate rejects them at startup.
pub fn day_key(now: DateTime<Utc>, offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    now.with_timezone(&offset).format("%Y-%m-%d").to_string()
}

pub fn today_key(offset_hours: i32) -> String {
    day_key(Utc::now(), offset_hours)
}

/// Identifier of the device/influencer/day throttle record
pub fn daily_review_key(device_id: &str, influencer_id: Uuid, day: &str) -> String {
    format!("{}_{}_{}", device_id, influencer_id, day)
}
