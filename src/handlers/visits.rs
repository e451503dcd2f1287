// src/handlers/visits.rs

use crate::config::Config;
use crate::errors::AppError;
use crate::services::VisitService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// POST /api/visits
/// Counts one site visit for the current local day
pub async fn record_visit(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, AppError> {
    let visit = VisitService::record(pool.get_ref(), config.day_offset_hours).await?;
    Ok(HttpResponse::Ok().json(visit))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/visits", web::post().to(record_visit));
}
