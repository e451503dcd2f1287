// src/handlers/votes.rs
// DOCUMENTATION: Influencer poll endpoints
// PURPOSE: Each device backs at most one influencer, counts are public

use crate::errors::AppError;
use crate::handlers::device::DeviceId;
use crate::services::{InfluencerVoteService, WriteLimiter};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// GET /api/votes
pub async fn vote_counts(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let counts = InfluencerVoteService::counts(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(counts))
}

/// GET /api/votes/me
pub async fn my_vote(
    pool: web::Data<PgPool>,
    device: DeviceId,
) -> Result<impl Responder, AppError> {
    let vote = InfluencerVoteService::my_vote(pool.get_ref(), device.as_str()).await?;
    Ok(HttpResponse::Ok().json(vote))
}

/// GET /api/votes/{id}
pub async fn vote_count(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let count = InfluencerVoteService::count(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(count))
}

/// POST /api/votes/{id}
///
/// DOCUMENTATION: Pressing the influencer the device already backs withdraws
/// the vote, pressing another one moves it.
pub async fn toggle_vote(
    pool: web::Data<PgPool>,
    limiter: web::Data<Arc<WriteLimiter>>,
    device: DeviceId,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    limiter.check(device.as_str())?;
    let result =
        InfluencerVoteService::toggle(pool.get_ref(), device.as_str(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    // "/me" is registered before "/{id}" so it is not parsed as an id
    cfg.service(
        web::scope("/api/votes")
            .route("", web::get().to(vote_counts))
            .route("/me", web::get().to(my_vote))
            .route("/{id}", web::get().to(vote_count))
            .route("/{id}", web::post().to(toggle_vote)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::App;
    use sqlx::postgres::PgPoolOptions;

    #[actix_web::test]
    async fn test_my_vote_requires_device() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .configure(config),
        )
        .await;

        let req = TestRequest::get().uri("/api/votes/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
