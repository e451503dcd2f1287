// src/handlers/reviews.rs
// DOCUMENTATION: Cross-influencer review endpoints

use crate::errors::AppError;
use crate::models::FeedQuery;
use crate::services::price_range::PRICE_RANGE_OPTIONS;
use crate::services::ReviewService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;

/// GET /api/reviews/feed?limit=
/// Latest reviews with the influencer they belong to
pub async fn review_feed(
    pool: web::Data<PgPool>,
    query: web::Query<FeedQuery>,
) -> Result<impl Responder, AppError> {
    let feed = ReviewService::feed(pool.get_ref(), query.limit).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// GET /api/price-ranges
/// Bands a review may pick, in display order
pub async fn price_ranges() -> impl Responder {
    HttpResponse::Ok().json(PRICE_RANGE_OPTIONS)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/price-ranges", web::get().to(price_ranges))
        .service(web::scope("/api/reviews").route("/feed", web::get().to(review_feed)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{self, TestRequest};
    use actix_web::App;

    #[actix_web::test]
    async fn test_price_ranges_catalogue() {
        let app = test::init_service(App::new().configure(config)).await;
        let req = TestRequest::get().uri("/api/price-ranges").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let values: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|o| o["value"].as_str())
            .collect();
        assert_eq!(values, vec!["1000-3000", "3000-5000", "5000-8000", "8000-10000", "10000+"]);
        assert_eq!(body[4]["tier"], "red");
    }
}
