// src/db/contact_repository.rs

use crate::errors::AppError;
use crate::models::ContactMessage;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub subject: Option<String>,
    pub message: Option<String>,
    pub instagram: Option<String>,
    pub phone: Option<String>,
    pub email: String,
}

pub struct ContactRepository;

impl ContactRepository {
    pub async fn create(
        pool: &PgPool,
        msg: &NewContactMessage,
    ) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (id, subject, message, instagram, phone, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&msg.subject)
        .bind(&msg.message)
        .bind(&msg.instagram)
        .bind(&msg.phone)
        .bind(&msg.email)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to store contact message: {}", e);
            AppError::DatabaseError(format!("Create contact message failed: {}", e))
        })
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<ContactMessage>, AppError> {
        sqlx::query_as::<_, ContactMessage>(
            "SELECT * FROM contact_messages ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list contact messages: {}", e);
            AppError::DatabaseError(format!("List contact messages failed: {}", e))
        })
    }
}
