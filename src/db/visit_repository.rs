// src/db/visit_repository.rs

use crate::errors::AppError;
use crate::models::DailyVisit;
use sqlx::PgPool;

pub struct VisitRepository;

impl VisitRepository {
    /// Atomic +1 on the day's counter, creating it on first visit
    pub async fn increment(pool: &PgPool, day: &str) -> Result<DailyVisit, AppError> {
        sqlx::query_as::<_, DailyVisit>(
            r#"
            INSERT INTO daily_visits (day, count)
            VALUES ($1, 1)
            ON CONFLICT (day) DO UPDATE
            SET count = daily_visits.count + 1
            RETURNING day, count
            "#,
        )
        .bind(day)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to record visit for {}: {}", day, e);
            AppError::DatabaseError(format!("Record visit failed: {}", e))
        })
    }

    pub async fn list_recent(pool: &PgPool, days: i64) -> Result<Vec<DailyVisit>, AppError> {
        sqlx::query_as::<_, DailyVisit>(
            "SELECT day, count FROM daily_visits ORDER BY day DESC LIMIT $1",
        )
        .bind(days)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list visits: {}", e);
            AppError::DatabaseError(format!("List visits failed: {}", e))
        })
    }
}
