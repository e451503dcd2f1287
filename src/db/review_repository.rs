// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Reviews, the per-device daily throttle and per-device like/dislike votes

use crate::errors::AppError;
use crate::models::{FeedRow, Review, VoteKind, VoteTransition};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Fields of a review ready for insertion (already trimmed and clamped)
#[derive(Debug, Clone)]
pub struct NewReview {
    pub influencer_id: Uuid,
    pub business_name: String,
    pub stars: i16,
    pub comment: Option<String>,
    pub instagram_handle: Option<String>,
    pub reviewer_avatar_url: Option<String>,
    pub video_url: Option<String>,
    pub price_range: Option<String>,
}

/// Per-influencer aggregates for the listing page
#[derive(Debug, Clone, FromRow)]
pub struct ReviewStats {
    pub influencer_id: Uuid,
    pub review_count: i64,
    pub avg_stars: Option<f64>,
    pub price_ranges: Option<Vec<String>>,
}

/// Counters after a vote, plus the device's vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub like_count: i32,
    pub dislike_count: i32,
    pub vote: Option<VoteKind>,
}

pub struct ReviewRepository;

impl ReviewRepository {
    /// Insert a review unless this device already reviewed the influencer today
    /// DOCUMENTATION: Claims the daily throttle row and writes the review in one
    /// transaction. A second claim for the same key inserts nothing and the whole
    /// transaction is rolled back.
    pub async fn create_with_daily_limit(
        pool: &PgPool,
        daily_key: &str,
        review: &NewReview,
    ) -> Result<Review, AppError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to start review transaction: {}", e);
            AppError::DatabaseError(format!("Start transaction failed: {}", e))
        })?;

        let claimed = sqlx::query(
            r#"
            INSERT INTO device_daily_reviews (id)
            VALUES ($1)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(daily_key)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to claim daily review slot {}: {}", daily_key, e);
            AppError::DatabaseError(format!("Claim daily slot failed: {}", e))
        })?;

        if claimed.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Err(AppError::DailyReviewLimit);
        }

        let created = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO influencer_reviews (
                id, influencer_id, business_name, stars, comment, instagram_handle,
                reviewer_avatar_url, video_url, price_range, like_count, dislike_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, 0)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(review.influencer_id)
        .bind(&review.business_name)
        .bind(review.stars)
        .bind(&review.comment)
        .bind(&review.instagram_handle)
        .bind(&review.reviewer_avatar_url)
        .bind(&review.video_url)
        .bind(&review.price_range)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create review: {}", e);
            AppError::DatabaseError(format!("Create review failed: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit review: {}", e);
            AppError::DatabaseError(format!("Commit review failed: {}", e))
        })?;

        Ok(created)
    }

    pub async fn daily_record_exists(pool: &PgPool, daily_key: &str) -> Result<bool, AppError> {
        let found: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM device_daily_reviews WHERE id = $1)")
                .bind(daily_key)
                .fetch_one(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to check daily slot {}: {}", daily_key, e);
                    AppError::DatabaseError(format!("Check daily slot failed: {}", e))
                })?;
        Ok(found.0)
    }

    /// Reviews for an influencer, newest first
    pub async fn get_reviews_by_influencer(
        pool: &PgPool,
        influencer_id: Uuid,
    ) -> Result<Vec<Review>, AppError> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM influencer_reviews
            WHERE influencer_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(influencer_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reviews for influencer {}: {}", influencer_id, e);
            AppError::DatabaseError(format!("Fetch reviews failed: {}", e))
        })
    }

    /// Latest reviews across all influencers
    pub async fn get_feed(pool: &PgPool, limit: i64) -> Result<Vec<FeedRow>, AppError> {
        sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT r.*,
                   i.name AS influencer_name,
                   i.profile_image_url AS influencer_profile_image_url
            FROM influencer_reviews r
            JOIN influencers i ON i.id = r.influencer_id
            ORDER BY r.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch review feed: {}", e);
            AppError::DatabaseError(format!("Fetch review feed failed: {}", e))
        })
    }

    pub async fn get_stats_for_all(pool: &PgPool) -> Result<Vec<ReviewStats>, AppError> {
        sqlx::query_as::<_, ReviewStats>(
            r#"
            SELECT
                influencer_id,
                COUNT(*) AS review_count,
                AVG(stars)::FLOAT8 AS avg_stars,
                ARRAY_REMOVE(ARRAY_AGG(price_range), NULL) AS price_ranges
            FROM influencer_reviews
            GROUP BY influencer_id
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch review stats: {}", e);
            AppError::DatabaseError(format!("Fetch review stats failed: {}", e))
        })
    }

    /// Toggle a device's like/dislike on a review
    /// DOCUMENTATION: The review row is locked first, so concurrent votes from the
    /// same device on the same review are serialized.
    pub async fn apply_vote(
        pool: &PgPool,
        influencer_id: Uuid,
        review_id: Uuid,
        device_id: &str,
        pressed: VoteKind,
    ) -> Result<VoteOutcome, AppError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to start vote transaction: {}", e);
            AppError::DatabaseError(format!("Start transaction failed: {}", e))
        })?;

        let counts: Option<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT like_count, dislike_count FROM influencer_reviews
            WHERE id = $1 AND influencer_id = $2
            FOR UPDATE
            "#,
        )
        .bind(review_id)
        .bind(influencer_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to lock review {}: {}", review_id, e);
            AppError::DatabaseError(format!("Lock review failed: {}", e))
        })?;

        let (like_count, dislike_count) =
            counts.ok_or_else(|| AppError::NotFound(format!("review {}", review_id)))?;

        let current: Option<(String,)> = sqlx::query_as(
            "SELECT vote FROM device_review_votes WHERE device_id = $1 AND review_id = $2",
        )
        .bind(device_id)
        .bind(review_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to read vote for review {}: {}", review_id, e);
            AppError::DatabaseError(format!("Read vote failed: {}", e))
        })?;
        let current = current.and_then(|(v,)| VoteKind::parse(&v));

        let transition = VoteTransition::compute(current, pressed);
        let (like_count, dislike_count) = transition.apply(like_count, dislike_count);

        sqlx::query(
            "UPDATE influencer_reviews SET like_count = $1, dislike_count = $2 WHERE id = $3",
        )
        .bind(like_count)
        .bind(dislike_count)
        .bind(review_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to update counters for review {}: {}", review_id, e);
            AppError::DatabaseError(format!("Update vote counters failed: {}", e))
        })?;

        let vote_write = match transition.new_vote {
            Some(vote) => sqlx::query(
                r#"
                INSERT INTO device_review_votes (device_id, review_id, vote)
                VALUES ($1, $2, $3)
                ON CONFLICT (device_id, review_id) DO UPDATE
                SET vote = EXCLUDED.vote, updated_at = NOW()
                "#,
            )
            .bind(device_id)
            .bind(review_id)
            .bind(vote.as_str()),
            None => sqlx::query(
                "DELETE FROM device_review_votes WHERE device_id = $1 AND review_id = $2",
            )
            .bind(device_id)
            .bind(review_id),
        };
        vote_write.execute(&mut *tx).await.map_err(|e| {
            log::error!("Failed to store device vote for review {}: {}", review_id, e);
            AppError::DatabaseError(format!("Store vote failed: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit vote: {}", e);
            AppError::DatabaseError(format!("Commit vote failed: {}", e))
        })?;

        Ok(VoteOutcome {
            like_count,
            dislike_count,
            vote: transition.new_vote,
        })
    }

    pub async fn get_device_vote(
        pool: &PgPool,
        review_id: Uuid,
        device_id: &str,
    ) -> Result<Option<VoteKind>, AppError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT vote FROM device_review_votes WHERE device_id = $1 AND review_id = $2",
        )
        .bind(device_id)
        .bind(review_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to read vote for review {}: {}", review_id, e);
            AppError::DatabaseError(format!("Read vote failed: {}", e))
        })?;

        Ok(row.and_then(|(v,)| VoteKind::parse(&v)))
    }

    pub async fn delete_review(
        pool: &PgPool,
        influencer_id: Uuid,
        review_id: Uuid,
    ) -> Result<(), AppError> {
        let result =
            sqlx::query("DELETE FROM influencer_reviews WHERE id = $1 AND influencer_id = $2")
                .bind(review_id)
                .bind(influencer_id)
                .execute(pool)
                .await
                .map_err(|e| {
                    log::error!("Failed to delete review {}: {}", review_id, e);
                    AppError::DatabaseError(format!("Delete review failed: {}", e))
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("review {}", review_id)));
        }
        Ok(())
    }
}
