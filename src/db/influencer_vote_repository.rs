// src/db/influencer_vote_repository.rs
// DOCUMENTATION: Device influencer votes and aggregate counters
// PURPOSE: One vote per device, counters kept in step inside a single transaction

use crate::errors::AppError;
use crate::models::InfluencerVoteChange;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

pub struct InfluencerVoteRepository;

impl InfluencerVoteRepository {
    async fn decrement(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<(), sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE influencer_vote_counts SET count = count - 1 WHERE influencer_id = $1 AND count > 1",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;

        // Counter at 1 (or missing): drop it instead of storing zero
        if updated.rows_affected() == 0 {
            sqlx::query("DELETE FROM influencer_vote_counts WHERE influencer_id = $1")
                .bind(id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn increment(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO influencer_vote_counts (influencer_id, count)
            VALUES ($1, 1)
            ON CONFLICT (influencer_id) DO UPDATE
            SET count = influencer_vote_counts.count + 1
            "#,
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn toggle_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        device_id: &str,
        influencer_id: Uuid,
    ) -> Result<InfluencerVoteChange, sqlx::Error> {
        // Make sure the device row exists so FOR UPDATE has something to lock
        sqlx::query(
            "INSERT INTO device_influencer_votes (device_id) VALUES ($1) ON CONFLICT (device_id) DO NOTHING",
        )
        .bind(device_id)
        .execute(&mut **tx)
        .await?;

        let (previous,): (Option<Uuid>,) = sqlx::query_as(
            "SELECT influencer_id FROM device_influencer_votes WHERE device_id = $1 FOR UPDATE",
        )
        .bind(device_id)
        .fetch_one(&mut **tx)
        .await?;

        let change = InfluencerVoteChange::compute(previous, influencer_id);
        let (decrement, increment) = change.counter_updates();

        if let Some(id) = decrement {
            Self::decrement(tx, id).await?;
        }
        if let Some(id) = increment {
            Self::increment(tx, id).await?;
        }

        sqlx::query(
            "UPDATE device_influencer_votes SET influencer_id = $1, updated_at = NOW() WHERE device_id = $2",
        )
        .bind(change.current_vote())
        .bind(device_id)
        .execute(&mut **tx)
        .await?;

        Ok(change)
    }

    /// Cast, withdraw or move this device's vote
    /// DOCUMENTATION: The pressed influencer is share-locked for the whole transaction,
    /// so a concurrent delete either waits or has already made this a NotFound.
    pub async fn toggle(
        pool: &PgPool,
        device_id: &str,
        influencer_id: Uuid,
    ) -> Result<InfluencerVoteChange, AppError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to start influencer vote transaction: {}", e);
            AppError::DatabaseError(format!("Start transaction failed: {}", e))
        })?;

        let influencer: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM influencers WHERE id = $1 FOR SHARE")
                .bind(influencer_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    log::error!("Failed to lock influencer {}: {}", influencer_id, e);
                    AppError::DatabaseError(format!("Lock influencer failed: {}", e))
                })?;
        if influencer.is_none() {
            return Err(AppError::NotFound(format!("influencer {}", influencer_id)));
        }

        let change = Self::toggle_in_tx(&mut tx, device_id, influencer_id)
            .await
            .map_err(|e| {
                log::error!("Failed to toggle influencer vote for {}: {}", influencer_id, e);
                AppError::DatabaseError(format!("Toggle influencer vote failed: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit influencer vote: {}", e);
            AppError::DatabaseError(format!("Commit influencer vote failed: {}", e))
        })?;

        Ok(change)
    }

    pub async fn all_counts(pool: &PgPool) -> Result<HashMap<Uuid, i64>, AppError> {
        let rows: Vec<(Uuid, i64)> =
            sqlx::query_as("SELECT influencer_id, count FROM influencer_vote_counts")
                .fetch_all(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to fetch vote counts: {}", e);
                    AppError::DatabaseError(format!("Fetch vote counts failed: {}", e))
                })?;
        Ok(rows.into_iter().collect())
    }

    pub async fn count_for(pool: &PgPool, influencer_id: Uuid) -> Result<i64, AppError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT count FROM influencer_vote_counts WHERE influencer_id = $1")
                .bind(influencer_id)
                .fetch_optional(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to fetch vote count for {}: {}", influencer_id, e);
                    AppError::DatabaseError(format!("Fetch vote count failed: {}", e))
                })?;
        Ok(row.map(|(c,)| c).unwrap_or(0))
    }

    pub async fn device_vote(pool: &PgPool, device_id: &str) -> Result<Option<Uuid>, AppError> {
        let row: Option<(Option<Uuid>,)> =
            sqlx::query_as("SELECT influencer_id FROM device_influencer_votes WHERE device_id = $1")
                .bind(device_id)
                .fetch_optional(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to fetch device vote: {}", e);
                    AppError::DatabaseError(format!("Fetch device vote failed: {}", e))
                })?;
        Ok(row.and_then(|(id,)| id))
    }
}
