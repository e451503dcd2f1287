// src/services/review_service.rs
// DOCUMENTATION: Business logic for reviews and review votes
// PURPOSE: Input cleanup, daily throttle keys and feed assembly

use crate::db::{InfluencerRepository, NewReview, ReviewRepository};
use crate::errors::AppError;
use crate::models::{
    CreateReviewRequest, EligibilityResponse, FeedInfluencer, FeedItem, FeedRow, ReviewResponse,
    StoredVoteResponse, VoteKind, VoteResponse,
};
use crate::services::day_key::{daily_review_key, today_key};
use crate::services::{image_url, price_range};
use sqlx::PgPool;
use uuid::Uuid;

pub const DEFAULT_FEED_LIMIT: i64 = 50;
pub const MAX_FEED_LIMIT: i64 = 200;

/// Trimmed value, `None` when blank
pub fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn clamp_stars(stars: i32) -> i16 {
    stars.clamp(1, 5) as i16
}

pub fn feed_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT)
}

/// Build the row to insert from a client request
pub fn prepare_review(influencer_id: Uuid, req: &CreateReviewRequest) -> Result<NewReview, AppError> {
    let business_name = clean(Some(&req.business_name))
        .ok_or_else(|| AppError::InvalidInput("business_name is required".to_string()))?;

    let price_range = clean(req.price_range.as_deref());
    if let Some(range) = &price_range {
        if !price_range::is_known(range) {
            return Err(AppError::InvalidInput(format!("unknown price range: {}", range)));
        }
    }

    let instagram_handle = clean(req.instagram_handle.as_deref());
    let reviewer_avatar_url = image_url::unavatar_url(instagram_handle.as_deref());

    Ok(NewReview {
        influencer_id,
        business_name,
        stars: clamp_stars(req.stars),
        comment: clean(req.comment.as_deref()),
        instagram_handle,
        reviewer_avatar_url,
        video_url: clean(req.video_url.as_deref()),
        price_range,
    })
}

fn feed_item(row: FeedRow) -> FeedItem {
    let influencer_id = row.review.influencer_id;
    let name = clean(row.influencer_name.as_deref()).unwrap_or_else(|| "İsimsiz".to_string());
    let avatar = clean(row.influencer_profile_image_url.as_deref())
        .unwrap_or_else(|| format!("https://i.pravatar.cc/150?u={}", influencer_id));

    FeedItem {
        review: row.review.to_response(),
        influencer: FeedInfluencer {
            id: influencer_id,
            name,
            avatar,
        },
    }
}

pub struct ReviewService;

impl ReviewService {
    /// Create a review, at most one per device, influencer and day
    pub async fn add_review(
        pool: &PgPool,
        influencer_id: Uuid,
        device_id: &str,
        req: &CreateReviewRequest,
        day_offset_hours: i32,
    ) -> Result<ReviewResponse, AppError> {
        let review = prepare_review(influencer_id, req)?;

        if !InfluencerRepository::exists(pool, influencer_id).await? {
            return Err(AppError::NotFound(format!("influencer {}", influencer_id)));
        }

        let key = daily_review_key(device_id, influencer_id, &today_key(day_offset_hours));
        let created = ReviewRepository::create_with_daily_limit(pool, &key, &review).await?;

        log::info!(
            "Review {} added for influencer {} ({} stars)",
            created.id,
            influencer_id,
            created.stars
        );
        Ok(created.to_response())
    }

    pub async fn can_submit(
        pool: &PgPool,
        influencer_id: Uuid,
        device_id: &str,
        day_offset_hours: i32,
    ) -> Result<EligibilityResponse, AppError> {
        let key = daily_review_key(device_id, influencer_id, &today_key(day_offset_hours));
        let exists = ReviewRepository::daily_record_exists(pool, &key).await?;
        Ok(EligibilityResponse { can_submit: !exists })
    }

    pub async fn list(pool: &PgPool, influencer_id: Uuid) -> Result<Vec<ReviewResponse>, AppError> {
        let reviews = ReviewRepository::get_reviews_by_influencer(pool, influencer_id).await?;
        Ok(reviews.iter().map(|r| r.to_response()).collect())
    }

    pub async fn feed(pool: &PgPool, limit: Option<i64>) -> Result<Vec<FeedItem>, AppError> {
        let rows = ReviewRepository::get_feed(pool, feed_limit(limit)).await?;
        Ok(rows.into_iter().map(feed_item).collect())
    }

    pub async fn vote(
        pool: &PgPool,
        influencer_id: Uuid,
        review_id: Uuid,
        device_id: &str,
        pressed: VoteKind,
    ) -> Result<VoteResponse, AppError> {
        let outcome =
            ReviewRepository::apply_vote(pool, influencer_id, review_id, device_id, pressed).await?;
        log::debug!(
            "Vote {} on review {}: likes={} dislikes={}",
            pressed.as_str(),
            review_id,
            outcome.like_count,
            outcome.dislike_count
        );
        Ok(VoteResponse {
            like_count: outcome.like_count,
            dislike_count: outcome.dislike_count,
            my_vote: outcome.vote,
        })
    }

    pub async fn stored_vote(
        pool: &PgPool,
        review_id: Uuid,
        device_id: &str,
    ) -> Result<StoredVoteResponse, AppError> {
        let my_vote = ReviewRepository::get_device_vote(pool, review_id, device_id).await?;
        Ok(StoredVoteResponse { my_vote })
    }

    pub async fn delete(pool: &PgPool, influencer_id: Uuid, review_id: Uuid) -> Result<(), AppError> {
        ReviewRepository::delete_review(pool, influencer_id, review_id).await?;
        log::info!("Deleted review {} of influencer {}", review_id, influencer_id);
        Ok(())
    }
}
