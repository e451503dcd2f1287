// src/models/visit.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Visit counter for one local day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyVisit {
    /// YYYY-MM-DD
    pub day: String,
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisitsQuery {
    pub days: Option<i64>,
}
