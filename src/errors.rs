// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Message returned when a device already reviewed an influencer today
pub const DAILY_REVIEW_LIMIT_MESSAGE: &str =
    "Bu cihazdan bu influencer için bugün zaten bir değerlendirme yapıldı. Yarın tekrar deneyebilirsiniz.";

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and a user-facing message.
/// Failed operations never leave partial writes behind, so clients keep their previous state.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{}", DAILY_REVIEW_LIMIT_MESSAGE)]
    DailyReviewLimit,

    #[error("Missing or malformed X-Device-Id header")]
    MissingDevice,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::DailyReviewLimit => "DAILY_REVIEW_LIMIT",
            AppError::MissingDevice => "MISSING_DEVICE",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

/// Convert AppError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DailyReviewLimit => StatusCode::CONFLICT,
            AppError::MissingDevice => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::DailyReviewLimit.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::NotFound("review".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::MissingDevice.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_daily_limit_message() {
        assert_eq!(AppError::DailyReviewLimit.to_string(), DAILY_REVIEW_LIMIT_MESSAGE);
    }
}
