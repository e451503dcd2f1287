// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::services::image_url::{
    initials_avatar_url, instagram_profile_url, reviewer_avatar_api_url,
};

/// Review left by a business about an influencer
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub influencer_id: Uuid,
    pub business_name: String,
    pub stars: i16,
    pub comment: Option<String>,
    pub instagram_handle: Option<String>,
    pub reviewer_avatar_url: Option<String>,
    pub video_url: Option<String>,
    /// Price band key, only used for the estimated range and never displayed
    pub price_range: Option<String>,
    pub like_count: i32,
    pub dislike_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Request to create a new review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(length(min = 1, max = 200))]
    pub business_name: String,
    /// Clamped into 1..=5 before storing
    pub stars: i32,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
    #[validate(length(max = 200))]
    pub instagram_handle: Option<String>,
    #[validate(length(max = 500))]
    pub video_url: Option<String>,
    pub price_range: Option<String>,
}

/// Review response DTO exposed via API
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub business_name: String,
    pub stars: i16,
    pub comment: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_avatar_url: Option<String>,
    /// Same-origin route serving the reviewer's Instagram picture
    pub reviewer_avatar_proxy_url: String,
    /// Initial-letter picture shown when the avatar fails to load
    pub fallback_avatar_url: String,
    /// Reviewer's Instagram profile, `#` without a handle
    pub instagram_profile_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub like_count: i32,
    pub dislike_count: i32,
}

impl Review {
    /// Convert database Review into API response
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            business_name: self.business_name.clone(),
            stars: self.stars,
            comment: self.comment.clone().unwrap_or_default(),
            date: self.created_at,
            instagram_handle: self.instagram_handle.clone(),
            reviewer_avatar_url: self.reviewer_avatar_url.clone(),
            reviewer_avatar_proxy_url: reviewer_avatar_api_url(self.instagram_handle.as_deref()),
            fallback_avatar_url: initials_avatar_url(
                self.instagram_handle.as_deref().or(Some(self.business_name.as_str())),
                96,
            ),
            instagram_profile_url: instagram_profile_url(self.instagram_handle.as_deref()),
            video_url: self.video_url.clone(),
            like_count: self.like_count.max(0),
            dislike_count: self.dislike_count.max(0),
        }
    }
}

/// Review joined with the influencer it belongs to, for the global feed
#[derive(Debug, Clone, FromRow)]
pub struct FeedRow {
    #[sqlx(flatten)]
    pub review: Review,
    pub influencer_name: Option<String>,
    pub influencer_profile_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedInfluencer {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub review: ReviewResponse,
    pub influencer: FeedInfluencer,
}

/// Query for the review feed
#[derive(Debug, Clone, Deserialize)]
pub struct FeedQuery {
    pub limit: Option<i64>,
}

/// A device's vote on a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Like => "like",
            VoteKind::Dislike => "dislike",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(VoteKind::Like),
            "dislike" => Some(VoteKind::Dislike),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub vote: VoteKind,
}

/// Counter changes and the device's vote after pressing like or dislike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub like_delta: i32,
    pub dislike_delta: i32,
    pub new_vote: Option<VoteKind>,
}

impl VoteTransition {
    /// Pressing the same button again withdraws the vote, the other button moves it
    pub fn compute(current: Option<VoteKind>, pressed: VoteKind) -> Self {
        use VoteKind::*;
        let (like_delta, dislike_delta, new_vote) = match (pressed, current) {
            (Like, Some(Like)) => (-1, 0, None),
            (Like, Some(Dislike)) => (1, -1, Some(Like)),
            (Like, None) => (1, 0, Some(Like)),
            (Dislike, Some(Dislike)) => (0, -1, None),
            (Dislike, Some(Like)) => (-1, 1, Some(Dislike)),
            (Dislike, None) => (0, 1, Some(Dislike)),
        };
        VoteTransition {
            like_delta,
            dislike_delta,
            new_vote,
        }
    }

    /// Apply to stored counters, never going below zero
    pub fn apply(&self, like_count: i32, dislike_count: i32) -> (i32, i32) {
        (
            (like_count.max(0) + self.like_delta).max(0),
            (dislike_count.max(0) + self.dislike_delta).max(0),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub like_count: i32,
    pub dislike_count: i32,
    pub my_vote: Option<VoteKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredVoteResponse {
    pub my_vote: Option<VoteKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EligibilityResponse {
    pub can_submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use VoteKind::*;

    #[test]
    fn test_vote_transition_table() {
        let cases = [
            (None, Like, 1, 0, Some(Like)),
            (Some(Like), Like, -1, 0, None),
            (Some(Dislike), Like, 1, -1, Some(Like)),
            (None, Dislike, 0, 1, Some(Dislike)),
            (Some(Dislike), Dislike, 0, -1, None),
            (Some(Like), Dislike, -1, 1, Some(Dislike)),
        ];

        for (current, pressed, like, dislike, new_vote) in cases {
            let t = VoteTransition::compute(current, pressed);
            assert_eq!(t.like_delta, like, "{:?} -> {:?}", current, pressed);
            assert_eq!(t.dislike_delta, dislike, "{:?} -> {:?}", current, pressed);
            assert_eq!(t.new_vote, new_vote, "{:?} -> {:?}", current, pressed);
        }
    }

    #[test]
    fn test_vote_apply_clamps_at_zero() {
        let t = VoteTransition::compute(Some(Like), Like);
        assert_eq!(t.apply(0, 3), (0, 3));

        let t = VoteTransition::compute(Some(Like), Dislike);
        assert_eq!(t.apply(-4, 0), (0, 1));
    }

    #[test]
    fn test_vote_kind_serde() {
        let req: VoteRequest = serde_json::from_str(r#"{"vote":"dislike"}"#).unwrap();
        assert_eq!(req.vote, Dislike);
        assert!(serde_json::from_str::<VoteRequest>(r#"{"vote":"meh"}"#).is_err());
        assert_eq!(VoteKind::parse("like"), Some(Like));
        assert_eq!(VoteKind::parse("LIKE"), None);
    }

    #[test]
    fn test_response_defaults() {
        let review = Review {
            id: Uuid::nil(),
            influencer_id: Uuid::nil(),
            business_name: "Kahve Durağı".to_string(),
            stars: 4,
            comment: None,
            instagram_handle: None,
            reviewer_avatar_url: None,
            video_url: None,
            price_range: Some("3000-5000".to_string()),
            like_count: -2,
            dislike_count: 1,
            created_at: Utc::now(),
        };
        let resp = review.to_response();
        assert_eq!(resp.comment, "");
        assert_eq!(resp.like_count, 0);
        assert_eq!(resp.dislike_count, 1);
        assert_eq!(resp.instagram_profile_url, "#");
        assert!(resp.fallback_avatar_url.contains("name=K"));
    }
}
