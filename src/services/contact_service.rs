// src/services/contact_service.rs

use crate::db::{ContactRepository, NewContactMessage};
use crate::errors::AppError;
use crate::models::{ContactMessageResponse, CreateContactMessageRequest};
use crate::services::review_service::clean;
use sqlx::PgPool;

pub fn prepare_message(req: &CreateContactMessageRequest) -> Result<NewContactMessage, AppError> {
    let email = clean(Some(&req.email))
        .ok_or_else(|| AppError::InvalidInput("email is required".to_string()))?;

    Ok(NewContactMessage {
        subject: clean(req.subject.as_deref()),
        message: clean(req.message.as_deref()),
        instagram: clean(req.instagram.as_deref()),
        phone: clean(req.phone.as_deref()),
        email,
    })
}

pub struct ContactService;

impl ContactService {
    pub async fn add(
        pool: &PgPool,
        req: &CreateContactMessageRequest,
    ) -> Result<ContactMessageResponse, AppError> {
        let msg = prepare_message(req)?;
        let created = ContactRepository::create(pool, &msg).await?;
        log::info!("Contact message {} received", created.id);
        Ok(created.to_response())
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ContactMessageResponse>, AppError> {
        let messages = ContactRepository::list_all(pool).await?;
        Ok(messages.iter().map(|m| m.to_response()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_required() {
        let req = CreateContactMessageRequest {
            subject: Some("Hi".to_string()),
            message: None,
            instagram: None,
            phone: None,
            email: "   ".to_string(),
        };
        assert!(matches!(prepare_message(&req), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_blanks_become_none() {
        let req = CreateContactMessageRequest {
            subject: Some(" Collab ".to_string()),
            message: Some("".to_string()),
            instagram: Some("  ".to_string()),
            phone: Some("0555".to_string()),
            email: " a@b.co ".to_string(),
        };
        let msg = prepare_message(&req).unwrap();
        assert_eq!(msg.subject.as_deref(), Some("Collab"));
        assert_eq!(msg.message, None);
        assert_eq!(msg.instagram, None);
        assert_eq!(msg.phone.as_deref(), Some("0555"));
        assert_eq!(msg.email, "a@b.co");
    }
}
