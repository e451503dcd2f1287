// src/handlers/contact.rs

use crate::errors::AppError;
use crate::handlers::device::DeviceId;
use crate::models::CreateContactMessageRequest;
use crate::services::{ContactService, WriteLimiter};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

/// POST /api/contact
/// The device header is optional here, it only feeds the rate limiter
pub async fn add_contact_message(
    pool: web::Data<PgPool>,
    limiter: web::Data<Arc<WriteLimiter>>,
    device: Option<DeviceId>,
    req: web::Json<CreateContactMessageRequest>,
) -> Result<impl Responder, AppError> {
    if let Err(e) = req.validate() {
        return Err(AppError::ValidationError(e.to_string()));
    }
    let key = device
        .as_ref()
        .map(DeviceId::as_str)
        .unwrap_or("anonymous-contact");
    limiter.check(key)?;

    let message = ContactService::add(pool.get_ref(), &req).await?;
    Ok(HttpResponse::Created().json(message))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/contact", web::post().to(add_contact_message));
}
