// src/db/report_repository.rs
// DOCUMENTATION: Evaluation report database operations
// PURPOSE: Store abuse reports and apply moderation outcomes

use crate::errors::AppError;
use crate::models::{
    EvaluationReport, STATUS_PENDING, STATUS_RESOLVED_REMOVED, STATUS_RESOLVED_UPHELD,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Report fields after reason expansion and trimming
#[derive(Debug, Clone)]
pub struct NewReport {
    pub influencer_id: Uuid,
    pub review_id: Uuid,
    pub reason: String,
    pub description: String,
    pub review_summary: Option<String>,
}

pub struct ReportRepository;

impl ReportRepository {
    pub async fn create(pool: &PgPool, report: &NewReport) -> Result<EvaluationReport, AppError> {
        sqlx::query_as::<_, EvaluationReport>(
            r#"
            INSERT INTO evaluation_reports (
                id, influencer_id, review_id, reason, description, review_summary, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(report.influencer_id)
        .bind(report.review_id)
        .bind(&report.reason)
        .bind(&report.description)
        .bind(&report.review_summary)
        .bind(STATUS_PENDING)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create report: {}", e);
            AppError::DatabaseError(format!("Create report failed: {}", e))
        })
    }

    /// All reports, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<EvaluationReport>, AppError> {
        sqlx::query_as::<_, EvaluationReport>(
            "SELECT * FROM evaluation_reports ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list reports: {}", e);
            AppError::DatabaseError(format!("List reports failed: {}", e))
        })
    }

    /// Delete the reported review and close the report as removed
    /// DOCUMENTATION: Both writes share one transaction. A review that is already
    /// gone does not block closing the report.
    pub async fn resolve_remove(
        pool: &PgPool,
        report_id: Uuid,
    ) -> Result<EvaluationReport, AppError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to start report transaction: {}", e);
            AppError::DatabaseError(format!("Start transaction failed: {}", e))
        })?;

        let report = sqlx::query_as::<_, EvaluationReport>(
            "SELECT * FROM evaluation_reports WHERE id = $1 FOR UPDATE",
        )
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to lock report {}: {}", report_id, e);
            AppError::DatabaseError(format!("Lock report failed: {}", e))
        })?
        .ok_or_else(|| AppError::NotFound(format!("report {}", report_id)))?;

        let deleted =
            sqlx::query("DELETE FROM influencer_reviews WHERE id = $1 AND influencer_id = $2")
                .bind(report.review_id)
                .bind(report.influencer_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    log::error!("Failed to delete reported review {}: {}", report.review_id, e);
                    AppError::DatabaseError(format!("Delete review failed: {}", e))
                })?;
        if deleted.rows_affected() == 0 {
            log::warn!(
                "Report {} points at review {} which no longer exists",
                report_id,
                report.review_id
            );
        }

        let updated = sqlx::query_as::<_, EvaluationReport>(
            r#"
            UPDATE evaluation_reports
            SET status = $1, resolved_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(STATUS_RESOLVED_REMOVED)
        .bind(report_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to resolve report {}: {}", report_id, e);
            AppError::DatabaseError(format!("Resolve report failed: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit report resolution: {}", e);
            AppError::DatabaseError(format!("Commit report failed: {}", e))
        })?;

        Ok(updated)
    }

    /// Close the report as unfounded, the review stays
    pub async fn resolve_upheld(
        pool: &PgPool,
        report_id: Uuid,
    ) -> Result<EvaluationReport, AppError> {
        sqlx::query_as::<_, EvaluationReport>(
            r#"
            UPDATE evaluation_reports
            SET status = $1, resolved_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(STATUS_RESOLVED_UPHELD)
        .bind(report_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to resolve report {}: {}", report_id, e);
            AppError::DatabaseError(format!("Resolve report failed: {}", e))
        })?
        .ok_or_else(|| AppError::NotFound(format!("report {}", report_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::{count_rows, insert_influencer, insert_review};

    fn new_report(influencer_id: Uuid, review_id: Uuid) -> NewReport {
        NewReport {
            influencer_id,
            review_id,
            reason: "Reklam / spam".to_string(),
            description: "Reklam / spam".to_string(),
            review_summary: Some("Pastane - 5 yıldız".to_string()),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resolve_remove_deletes_review_and_closes_report(pool: PgPool) {
        let influencer = insert_influencer(&pool, "Ayşe").await;
        let review = insert_review(&pool, influencer, "Pastane").await;
        let kept = insert_review(&pool, influencer, "Fırın").await;
        let report = ReportRepository::create(&pool, &new_report(influencer, review))
            .await
            .unwrap();
        assert_eq!(report.status, STATUS_PENDING);
        assert!(report.resolved_at.is_none());

        let resolved = ReportRepository::resolve_remove(&pool, report.id).await.unwrap();
        assert_eq!(resolved.status, STATUS_RESOLVED_REMOVED);
        assert!(resolved.resolved_at.is_some());

        let remaining: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM influencer_reviews")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, vec![(kept,)]);

        // The report outlives its review
        let listed = ReportRepository::list_all(&pool).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, STATUS_RESOLVED_REMOVED);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resolve_remove_with_review_already_gone(pool: PgPool) {
        let influencer = insert_influencer(&pool, "Mert").await;
        let review = insert_review(&pool, influencer, "Lokanta").await;
        let report = ReportRepository::create(&pool, &new_report(influencer, review))
            .await
            .unwrap();
        sqlx::query("DELETE FROM influencer_reviews WHERE id = $1")
            .bind(review)
            .execute(&pool)
            .await
            .unwrap();

        let resolved = ReportRepository::resolve_remove(&pool, report.id).await.unwrap();
        assert_eq!(resolved.status, STATUS_RESOLVED_REMOVED);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_missing_report_is_not_found(pool: PgPool) {
        assert!(matches!(
            ReportRepository::resolve_remove(&pool, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            ReportRepository::resolve_upheld(&pool, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resolve_upheld_keeps_review(pool: PgPool) {
        let influencer = insert_influencer(&pool, "Zeynep").await;
        let review = insert_review(&pool, influencer, "Kafe").await;
        let report = ReportRepository::create(&pool, &new_report(influencer, review))
            .await
            .unwrap();

        let resolved = ReportRepository::resolve_upheld(&pool, report.id).await.unwrap();
        assert_eq!(resolved.status, STATUS_RESOLVED_UPHELD);
        assert!(resolved.resolved_at.is_some());
        assert_eq!(
            count_rows(&pool, "SELECT COUNT(*) FROM influencer_reviews").await,
            1
        );
    }
}
