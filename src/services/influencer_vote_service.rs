// src/services/influencer_vote_service.rs
// DOCUMENTATION: "Who is the best influencer" poll, one vote per device

use crate::db::InfluencerVoteRepository;
use crate::errors::AppError;
use crate::models::{
    MyInfluencerVoteResponse, ToggleInfluencerVoteResponse, VoteCountResponse, VoteCountsResponse,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct InfluencerVoteService;

impl InfluencerVoteService {
    /// Toggle the device's vote and return the pressed influencer's new count
    pub async fn toggle(
        pool: &PgPool,
        device_id: &str,
        influencer_id: Uuid,
    ) -> Result<ToggleInfluencerVoteResponse, AppError> {
        let change = InfluencerVoteRepository::toggle(pool, device_id, influencer_id).await?;
        log::debug!("Influencer vote change: {:?}", change);

        let count = InfluencerVoteRepository::count_for(pool, influencer_id).await?;
        Ok(ToggleInfluencerVoteResponse {
            influencer_id,
            count,
            my_vote: change.current_vote(),
        })
    }

    pub async fn counts(pool: &PgPool) -> Result<VoteCountsResponse, AppError> {
        let counts = InfluencerVoteRepository::all_counts(pool).await?;
        Ok(VoteCountsResponse { counts })
    }

    pub async fn count(pool: &PgPool, influencer_id: Uuid) -> Result<VoteCountResponse, AppError> {
        let count = InfluencerVoteRepository::count_for(pool, influencer_id).await?;
        Ok(VoteCountResponse {
            influencer_id,
            count,
        })
    }

    pub async fn my_vote(pool: &PgPool, device_id: &str) -> Result<MyInfluencerVoteResponse, AppError> {
        let influencer_id = InfluencerVoteRepository::device_vote(pool, device_id).await?;
        Ok(MyInfluencerVoteResponse { influencer_id })
    }
}
