// src/handlers/extract.rs
// DOCUMENTATION: Extractor error handling
// PURPOSE: Malformed bodies, path segments and query strings answer with the AppError JSON body

use crate::errors::AppError;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{web, Error, HttpRequest};

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> Error {
    log::debug!("Rejected JSON body on {}: {}", req.path(), err);
    AppError::ValidationError(format!("invalid JSON body: {}", err)).into()
}

fn path_error(err: PathError, req: &HttpRequest) -> Error {
    log::debug!("Rejected path {}: {}", req.path(), err);
    AppError::ValidationError(format!("invalid path parameter: {}", err)).into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> Error {
    log::debug!("Rejected query on {}: {}", req.path(), err);
    AppError::ValidationError(format!("invalid query string: {}", err)).into()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));
}
