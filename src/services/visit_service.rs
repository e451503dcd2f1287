// src/services/visit_service.rs

use crate::db::VisitRepository;
use crate::errors::AppError;
use crate::models::DailyVisit;
use crate::services::day_key::today_key;
use sqlx::PgPool;

pub const DEFAULT_VISIT_DAYS: i64 = 30;
pub const MAX_VISIT_DAYS: i64 = 366;

pub fn visit_days(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_VISIT_DAYS).clamp(1, MAX_VISIT_DAYS)
}

pub struct VisitService;

impl VisitService {
    pub async fn record(pool: &PgPool, day_offset_hours: i32) -> Result<DailyVisit, AppError> {
        let day = today_key(day_offset_hours);
        VisitRepository::increment(pool, &day).await
    }

    pub async fn list(pool: &PgPool, days: Option<i64>) -> Result<Vec<DailyVisit>, AppError> {
        VisitRepository::list_recent(pool, visit_days(days)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_days_bounds() {
        assert_eq!(visit_days(None), 30);
        assert_eq!(visit_days(Some(7)), 7);
        assert_eq!(visit_days(Some(0)), 1);
        assert_eq!(visit_days(Some(5000)), 366);
    }
}
