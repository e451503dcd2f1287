// src/handlers/influencers.rs
// DOCUMENTATION: Public influencer, review, review vote and report endpoints
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::errors::AppError;
use crate::handlers::device::DeviceId;
use crate::models::{CreateReportRequest, CreateReviewRequest, InfluencerListQuery, VoteRequest};
use crate::services::{InfluencerService, ReportService, ReviewService, WriteLimiter};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// GET /api/influencers
/// Brand front first, then newest; `q` filters and `sort` reorders
pub async fn list_influencers(
    pool: web::Data<PgPool>,
    query: web::Query<InfluencerListQuery>,
) -> Result<impl Responder, AppError> {
    let influencers = InfluencerService::list(pool.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(influencers))
}

/// GET /api/influencers/{id}
pub async fn get_influencer(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let influencer = InfluencerService::get(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(influencer))
}

/// GET /api/influencers/{id}/reviews
/// Newest first
pub async fn get_reviews(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let reviews = ReviewService::list(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// POST /api/influencers/{id}/reviews
///
/// DOCUMENTATION: One review per device, influencer and local day. A second
/// attempt returns 409 DAILY_REVIEW_LIMIT and stores nothing.
pub async fn add_review(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<Arc<WriteLimiter>>,
    device: DeviceId,
    path: web::Path<Uuid>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, AppError> {
    if let Err(e) = req.validate() {
        return Err(AppError::ValidationError(e.to_string()));
    }
    limiter.check(device.as_str())?;

    let review = ReviewService::add_review(
        pool.get_ref(),
        path.into_inner(),
        device.as_str(),
        &req,
        config.day_offset_hours,
    )
    .await?;
    Ok(HttpResponse::Created().json(review))
}

/// GET /api/influencers/{id}/reviews/eligibility
pub async fn review_eligibility(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    device: DeviceId,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let eligibility = ReviewService::can_submit(
        pool.get_ref(),
        path.into_inner(),
        device.as_str(),
        config.day_offset_hours,
    )
    .await?;
    Ok(HttpResponse::Ok().json(eligibility))
}

/// GET /api/influencers/{id}/reviews/{rid}/vote
pub async fn get_review_vote(
    pool: web::Data<PgPool>,
    device: DeviceId,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    let (_, review_id) = path.into_inner();
    let vote = ReviewService::stored_vote(pool.get_ref(), review_id, device.as_str()).await?;
    Ok(HttpResponse::Ok().json(vote))
}

/// POST /api/influencers/{id}/reviews/{rid}/vote
/// Like/dislike toggle, returns the new counters
pub async fn vote_review(
    pool: web::Data<PgPool>,
    limiter: web::Data<Arc<WriteLimiter>>,
    device: DeviceId,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<VoteRequest>,
) -> Result<impl Responder, AppError> {
    limiter.check(device.as_str())?;

    let (influencer_id, review_id) = path.into_inner();
    let result = ReviewService::vote(
        pool.get_ref(),
        influencer_id,
        review_id,
        device.as_str(),
        req.vote,
    )
    .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// POST /api/influencers/{id}/reviews/{rid}/reports
pub async fn add_report(
    pool: web::Data<PgPool>,
    limiter: web::Data<Arc<WriteLimiter>>,
    device: DeviceId,
    path: web::Path<(Uuid, Uuid)>,
    req: web::Json<CreateReportRequest>,
) -> Result<impl Responder, AppError> {
    if let Err(e) = req.validate() {
        return Err(AppError::ValidationError(e.to_string()));
    }
    limiter.check(device.as_str())?;

    let (influencer_id, review_id) = path.into_inner();
    let report = ReportService::add(pool.get_ref(), influencer_id, review_id, &req).await?;
    Ok(HttpResponse::Created().json(report))
}

/// Configuration for influencer routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/influencers")
            .route("", web::get().to(list_influencers))
            .route("/{id}", web::get().to(get_influencer))
            .route("/{id}/reviews", web::get().to(get_reviews))
            .route("/{id}/reviews", web::post().to(add_review))
            .route("/{id}/reviews/eligibility", web::get().to(review_eligibility))
            .route("/{id}/reviews/{rid}/vote", web::get().to(get_review_vote))
            .route("/{id}/reviews/{rid}/vote", web::post().to(vote_review))
            .route("/{id}/reviews/{rid}/reports", web::post().to(add_report)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::App;
    use sqlx::postgres::PgPoolOptions;

    // Pool that never connects, requests rejected before any query are safe
    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap()
    }

    #[actix_web::test]
    async fn test_add_review_requires_device() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::for_tests()))
                .app_data(web::Data::new(Arc::new(WriteLimiter::per_minute(10))))
                .configure(config),
        )
        .await;

        let req = TestRequest::post()
            .uri(&format!("/api/influencers/{}/reviews", Uuid::new_v4()))
            .set_json(serde_json::json!({"business_name": "Shop", "stars": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "MISSING_DEVICE");
    }

    #[actix_web::test]
    async fn test_add_review_validates_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(Config::for_tests()))
                .app_data(web::Data::new(Arc::new(WriteLimiter::per_minute(10))))
                .configure(config),
        )
        .await;

        let req = TestRequest::post()
            .uri(&format!("/api/influencers/{}/reviews", Uuid::new_v4()))
            .insert_header(("X-Device-Id", "device-1"))
            .set_json(serde_json::json!({"business_name": "", "stars": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_vote_rate_limited_per_device() {
        let limiter = Arc::new(WriteLimiter::per_minute(1));
        limiter.check("busy-device").unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(lazy_pool()))
                .app_data(web::Data::new(limiter))
                .configure(config),
        )
        .await;

        let req = TestRequest::post()
            .uri(&format!(
                "/api/influencers/{}/reviews/{}/vote",
                Uuid::new_v4(),
                Uuid::new_v4()
            ))
            .insert_header(("X-Device-Id", "busy-device"))
            .set_json(serde_json::json!({"vote": "like"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
