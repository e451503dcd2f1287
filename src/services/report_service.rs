// src/services/report_service.rs
// DOCUMENTATION: Review abuse reports and their moderation

use crate::db::{NewReport, ReportRepository};
use crate::errors::AppError;
use crate::models::{CreateReportRequest, ReportResponse, REPORT_REASONS};
use crate::services::review_service::clean;
use sqlx::PgPool;
use uuid::Uuid;

/// Stored reason text for a request
/// DOCUMENTATION: Known codes expand to their label, `other` takes the free text
/// and anything else is kept as written.
pub fn reason_text(reason: &str, reason_other: Option<&str>) -> Result<String, AppError> {
    let reason = reason.trim();
    let text = if reason == "other" {
        clean(reason_other)
    } else {
        REPORT_REASONS
            .iter()
            .find(|(code, _)| *code == reason)
            .map(|(_, label)| label.to_string())
            .or_else(|| clean(Some(reason)))
    };

    text.ok_or_else(|| AppError::InvalidInput("a report reason is required".to_string()))
}

pub fn prepare_report(
    influencer_id: Uuid,
    review_id: Uuid,
    req: &CreateReportRequest,
) -> Result<NewReport, AppError> {
    let reason = reason_text(&req.reason, req.reason_other.as_deref())?;
    let description = clean(Some(&req.description)).unwrap_or_else(|| reason.clone());

    Ok(NewReport {
        influencer_id,
        review_id,
        reason,
        description,
        review_summary: clean(req.review_summary.as_deref()),
    })
}

pub struct ReportService;

impl ReportService {
    pub async fn add(
        pool: &PgPool,
        influencer_id: Uuid,
        review_id: Uuid,
        req: &CreateReportRequest,
    ) -> Result<ReportResponse, AppError> {
        let report = prepare_report(influencer_id, review_id, req)?;
        let created = ReportRepository::create(pool, &report).await?;
        log::info!("Review {} reported: {}", review_id, created.reason);
        Ok(created.to_response())
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ReportResponse>, AppError> {
        let reports = ReportRepository::list_all(pool).await?;
        Ok(reports.iter().map(|r| r.to_response()).collect())
    }

    pub async fn resolve_remove(pool: &PgPool, report_id: Uuid) -> Result<ReportResponse, AppError> {
        let report = ReportRepository::resolve_remove(pool, report_id).await?;
        log::info!("Report {} resolved, review {} removed", report_id, report.review_id);
        Ok(report.to_response())
    }

    pub async fn resolve_upheld(pool: &PgPool, report_id: Uuid) -> Result<ReportResponse, AppError> {
        let report = ReportRepository::resolve_upheld(pool, report_id).await?;
        log::info!("Report {} resolved, review {} kept", report_id, report.review_id);
        Ok(report.to_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(reason: &str, other: Option<&str>, description: &str) -> CreateReportRequest {
        CreateReportRequest {
            reason: reason.to_string(),
            reason_other: other.map(str::to_string),
            description: description.to_string(),
            review_summary: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_reason_codes_expand() {
        assert_eq!(reason_text("spam", None).unwrap(), "Reklam / spam");
        assert_eq!(reason_text(" fake ", None).unwrap(), "Yanıltıcı veya sahte değerlendirme");
        assert_eq!(
            reason_text("copyright", None).unwrap(),
            "Telif veya kişilik hakkı ihlali"
        );
        assert_eq!(reason_text("custom words", None).unwrap(), "custom words");
    }

    #[test]
    fn test_other_requires_text() {
        assert_eq!(reason_text("other", Some(" Yanlış kişi ")).unwrap(), "Yanlış kişi");
        assert!(matches!(reason_text("other", Some("  ")), Err(AppError::InvalidInput(_))));
        assert!(matches!(reason_text("other", None), Err(AppError::InvalidInput(_))));
        assert!(matches!(reason_text("   ", None), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_description_falls_back_to_reason() {
        let report = prepare_report(Uuid::nil(), Uuid::nil(), &request("copyright", None, " ")).unwrap();
        assert_eq!(report.description, report.reason);
        assert_eq!(report.review_summary, None);

        let report = prepare_report(Uuid::nil(), Uuid::nil(), &request("spam", None, "Takipçi satıyor")).unwrap();
        assert_eq!(report.description, "Takipçi satıyor");
    }
}
