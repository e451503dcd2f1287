// src/models/contact.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Message sent through the contact form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub instagram: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContactMessageRequest {
    #[validate(length(max = 200))]
    pub subject: Option<String>,
    #[validate(length(max = 5000))]
    pub message: Option<String>,
    #[validate(length(max = 200))]
    pub instagram: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    /// Required, checked after trimming
    #[validate(length(max = 254))]
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactMessageResponse {
    pub id: Uuid,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl ContactMessage {
    pub fn to_response(&self) -> ContactMessageResponse {
        ContactMessageResponse {
            id: self.id,
            subject: self.subject.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_default(),
            instagram: self.instagram.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            date: self.created_at,
        }
    }
}
