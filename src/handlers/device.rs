// src/handlers/device.rs
// DOCUMENTATION: Anonymous device identity
// PURPOSE: Extract and validate the X-Device-Id header for per-device limits and votes

use crate::errors::AppError;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const DEVICE_HEADER: &str = "X-Device-Id";
const MAX_DEVICE_ID_LEN: usize = 64;

/// Client generated device identifier, 1..=64 chars of `[A-Za-z0-9_-]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_DEVICE_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| DeviceId(raw.to_string()))
    }
}

impl FromRequest for DeviceId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let device = req
            .headers()
            .get(DEVICE_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(DeviceId::parse);

        ready(device.ok_or_else(|| {
            log::debug!("Request to {} without a valid device id", req.path());
            AppError::MissingDevice
        }))
    }
}
