// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for curation and moderation
// PURPOSE: Influencer management, report resolution, inbox and traffic views

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{CreateInfluencerRequest, VisitsQuery, STATUS_PENDING};
use crate::services::{
    ContactService, ImageCache, InfluencerService, ReportService, ReviewService, VisitService,
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// POST /admin/influencers
pub async fn create_influencer(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    body: web::Json<CreateInfluencerRequest>,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    if let Err(e) = body.validate() {
        return Err(AppError::ValidationError(e.to_string()));
    }

    let influencer = InfluencerService::create(pool.get_ref(), &body).await?;
    Ok(HttpResponse::Created().json(influencer))
}

/// DELETE /admin/influencers/{id}
pub async fn delete_influencer(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    InfluencerService::delete(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /admin/influencers/{id}/reviews/{rid}
pub async fn delete_review(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    let (influencer_id, review_id) = path.into_inner();
    ReviewService::delete(pool.get_ref(), influencer_id, review_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /admin/reports
/// Newest first, every status
pub async fn list_reports(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    let reports = ReportService::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// POST /admin/reports/{id}/remove
///
/// DOCUMENTATION: Deletes the reported review and marks the report
/// resolved_removed in one transaction
pub async fn resolve_remove(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    let report = ReportService::resolve_remove(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// POST /admin/reports/{id}/uphold
pub async fn resolve_upheld(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    let report = ReportService::resolve_upheld(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// GET /admin/contact-messages
pub async fn list_contact_messages(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    let messages = ContactService::list(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// GET /admin/visits?days=
pub async fn list_visits(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
    query: web::Query<VisitsQuery>,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    let visits = VisitService::list(pool.get_ref(), query.days).await?;
    Ok(HttpResponse::Ok().json(visits))
}

/// Response for the admin dashboard counters
#[derive(Debug, Serialize)]
pub struct AdminStatsResponse {
    pub influencers: i64,
    pub reviews: i64,
    pub pending_reports: i64,
    pub contact_messages: i64,
    /// Proxied images currently held in memory
    pub cached_images: usize,
    pub cached_image_bytes: usize,
}

/// GET /admin/stats
///
/// DOCUMENTATION: Row counts for the dashboard plus image cache usage
pub async fn admin_stats(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<Arc<ImageCache>>,
    req: HttpRequest,
) -> Result<impl Responder, AppError> {
    verify_admin_token(&req, &config)?;

    let (influencers, reviews, pending_reports, contact_messages): (i64, i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM influencers),
                (SELECT COUNT(*) FROM influencer_reviews),
                (SELECT COUNT(*) FROM evaluation_reports WHERE status = $1),
                (SELECT COUNT(*) FROM contact_messages)
            "#,
        )
        .bind(STATUS_PENDING)
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

    let cache_stats = cache.stats().await;

    Ok(HttpResponse::Ok().json(AdminStatsResponse {
        influencers,
        reviews,
        pending_reports,
        contact_messages,
        cached_images: cache_stats.active_entries,
        cached_image_bytes: cache_stats.total_bytes,
    }))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), AppError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token: {}", req.path());
            AppError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token: {}", req.path());
        return Err(AppError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/influencers", web::post().to(create_influencer))
            .route("/influencers/{id}", web::delete().to(delete_influencer))
            .route("/influencers/{id}/reviews/{rid}", web::delete().to(delete_review))
            .route("/reports", web::get().to(list_reports))
            .route("/reports/{id}/remove", web::post().to(resolve_remove))
            .route("/reports/{id}/uphold", web::post().to(resolve_upheld))
            .route("/contact-messages", web::get().to(list_contact_messages))
            .route("/visits", web::get().to(list_visits))
            .route("/stats", web::get().to(admin_stats)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::App;
    use sqlx::postgres::PgPoolOptions;

    #[test]
    fn test_verify_admin_token() {
        let config = Config::for_tests();

        let req = TestRequest::default().to_http_request();
        assert!(matches!(verify_admin_token(&req, &config), Err(AppError::Unauthorized)));

        let req = TestRequest::default()
            .insert_header(("X-Admin-Token", "nope"))
            .to_http_request();
        assert!(matches!(verify_admin_token(&req, &config), Err(AppError::Forbidden)));

        let req = TestRequest::default()
            .insert_header(("X-Admin-Token", "test-admin"))
            .to_http_request();
        assert!(verify_admin_token(&req, &config).is_ok());
    }

    #[actix_web::test]
    async fn test_admin_routes_reject_before_touching_db() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(Config::for_tests()))
                .configure(config),
        )
        .await;

        let req = TestRequest::get().uri("/admin/reports").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = TestRequest::post()
            .uri(&format!("/admin/reports/{}/remove", Uuid::new_v4()))
            .insert_header(("X-Admin-Token", "wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }
}
