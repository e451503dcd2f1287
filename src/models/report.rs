// src/models/report.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_RESOLVED_REMOVED: &str = "resolved_removed";
pub const STATUS_RESOLVED_UPHELD: &str = "resolved_upheld";

/// Predefined report reasons and their human readable labels
pub const REPORT_REASONS: [(&str, &str); 5] = [
    ("fake", "Yanıltıcı veya sahte değerlendirme"),
    ("inappropriate", "Hakaret veya uygunsuz içerik"),
    ("spam", "Reklam / spam"),
    ("copyright", "Telif veya kişilik hakkı ihlali"),
    ("other", "Diğer"),
];

/// Abuse report raised against a review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EvaluationReport {
    pub id: Uuid,
    pub influencer_id: Uuid,
    pub review_id: Uuid,
    pub reason: String,
    pub description: String,
    pub review_summary: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    ResolvedRemoved,
    ResolvedUpheld,
}

impl ReportStatus {
    /// Unknown stored values are treated as pending
    pub fn from_db(value: &str) -> Self {
        match value {
            STATUS_RESOLVED_REMOVED => ReportStatus::ResolvedRemoved,
            STATUS_RESOLVED_UPHELD => ReportStatus::ResolvedUpheld,
            _ => ReportStatus::Pending,
        }
    }
}

/// Request body for reporting a review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReportRequest {
    /// One of the predefined reason codes, or free text
    #[validate(length(min = 1, max = 100))]
    pub reason: String,
    /// Required when reason is "other"
    #[validate(length(max = 300))]
    pub reason_other: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 300))]
    pub review_summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportResponse {
    pub id: Uuid,
    pub influencer_id: Uuid,
    pub review_id: Uuid,
    pub reason: String,
    pub description: String,
    pub status: ReportStatus,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_summary: Option<String>,
}

impl EvaluationReport {
    pub fn to_response(&self) -> ReportResponse {
        ReportResponse {
            id: self.id,
            influencer_id: self.influencer_id,
            review_id: self.review_id,
            reason: self.reason.clone(),
            description: self.description.clone(),
            status: ReportStatus::from_db(&self.status),
            date: self.created_at,
            resolved_at: self.resolved_at,
            review_summary: self.review_summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_db() {
        assert_eq!(ReportStatus::from_db("resolved_removed"), ReportStatus::ResolvedRemoved);
        assert_eq!(ReportStatus::from_db("resolved_upheld"), ReportStatus::ResolvedUpheld);
        assert_eq!(ReportStatus::from_db("pending"), ReportStatus::Pending);
        assert_eq!(ReportStatus::from_db("garbage"), ReportStatus::Pending);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ReportStatus::ResolvedUpheld).unwrap();
        assert_eq!(json, "\"resolved_upheld\"");
    }
}
