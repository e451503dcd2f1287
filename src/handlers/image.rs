// src/handlers/image.rs
// DOCUMENTATION: Same-origin image and avatar proxy routes
// PURPOSE: Serve remote profile pictures without hotlink or CORS failures in the browser

use crate::services::image_proxy::{extract_url_param, is_url_allowed, sanitize_avatar_username};
use crate::services::image_url::PLACEHOLDER_AVATAR;
use crate::services::{CachedImage, ImageProxyClient};
use actix_web::http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Debug, Deserialize)]
pub struct AvatarQuery {
    pub username: Option<String>,
}

fn placeholder_redirect() -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((LOCATION, PLACEHOLDER_AVATAR))
        .finish()
}

fn image_response(image: CachedImage) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, image.content_type))
        .insert_header((CACHE_CONTROL, IMAGE_CACHE_CONTROL))
        .body(image.body)
}

/// GET /api/image?url=
///
/// DOCUMENTATION: The query string is read raw so signed CDN URLs keep their
/// own `&` parameters. Non-https or off-list hosts never leave the server.
pub async fn proxy_image(
    client: web::Data<ImageProxyClient>,
    req: HttpRequest,
) -> HttpResponse {
    let Some(target) = extract_url_param(req.query_string()) else {
        return placeholder_redirect();
    };
    if !is_url_allowed(&target) {
        log::warn!("Image proxy rejected {}", target);
        return placeholder_redirect();
    }

    match client.proxy_image(&target).await {
        Some(image) => image_response(image),
        None => placeholder_redirect(),
    }
}

/// GET /api/avatar?username=
pub async fn avatar(
    client: web::Data<ImageProxyClient>,
    query: web::Query<AvatarQuery>,
) -> HttpResponse {
    let Some(username) = sanitize_avatar_username(query.username.as_deref()) else {
        return placeholder_redirect();
    };

    match client.avatar(&username).await {
        Some(image) => image_response(image),
        None => placeholder_redirect(),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/image", web::get().to(proxy_image))
        .route("/api/avatar", web::get().to(avatar));
}
