// src/db/influencer_repository.rs
// DOCUMENTATION: Influencer database operations
// PURPOSE: Catalogue reads for the public site and admin create/delete

use crate::errors::AppError;
use crate::models::{CreateInfluencerRequest, Influencer};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

pub struct InfluencerRepository;

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl InfluencerRepository {
    /// All influencers, brand front profiles first, then newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Influencer>, AppError> {
        sqlx::query_as::<_, Influencer>(
            r#"
            SELECT * FROM influencers
            ORDER BY brand_front DESC, created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list influencers: {}", e);
            AppError::DatabaseError(format!("List influencers failed: {}", e))
        })
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Influencer, AppError> {
        sqlx::query_as::<_, Influencer>("SELECT * FROM influencers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch influencer {}: {}", id, e);
                AppError::DatabaseError(format!("Fetch influencer failed: {}", e))
            })?
            .ok_or_else(|| AppError::NotFound(format!("influencer {}", id)))
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        let found: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM influencers WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to check influencer {}: {}", id, e);
                AppError::DatabaseError(format!("Check influencer failed: {}", e))
            })?;
        Ok(found.0)
    }

    pub async fn create(
        pool: &PgPool,
        req: &CreateInfluencerRequest,
    ) -> Result<Influencer, AppError> {
        sqlx::query_as::<_, Influencer>(
            r#"
            INSERT INTO influencers (
                id, name, username, category, followers, engagement,
                instagram_url, profile_image_url, thumbnail_url, reels, brand_front
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.name.trim())
        .bind(blank_to_none(&req.username))
        .bind(blank_to_none(&req.category))
        .bind(blank_to_none(&req.followers))
        .bind(blank_to_none(&req.engagement))
        .bind(blank_to_none(&req.instagram_url))
        .bind(blank_to_none(&req.profile_image_url))
        .bind(blank_to_none(&req.thumbnail_url))
        .bind(Value::Array(req.reels.clone()))
        .bind(req.brand_front)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create influencer: {}", e);
            AppError::DatabaseError(format!("Create influencer failed: {}", e))
        })
    }

    /// Reviews and their votes go with it (ON DELETE CASCADE)
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM influencers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete influencer {}: {}", id, e);
                AppError::DatabaseError(format!("Delete influencer failed: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("influencer {}", id)));
        }
        Ok(())
    }
}
