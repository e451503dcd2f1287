// src/models/influencer_vote.rs

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Result of a device pressing the vote button on an influencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfluencerVoteChange {
    /// First vote from this device
    Cast(Uuid),
    /// Same influencer pressed again, vote withdrawn
    Withdrawn(Uuid),
    /// Vote moved from one influencer to another
    Moved { from: Uuid, to: Uuid },
}

impl InfluencerVoteChange {
    pub fn compute(previous: Option<Uuid>, pressed: Uuid) -> Self {
        match previous {
            Some(prev) if prev == pressed => InfluencerVoteChange::Withdrawn(pressed),
            Some(prev) => InfluencerVoteChange::Moved {
                from: prev,
                to: pressed,
            },
            None => InfluencerVoteChange::Cast(pressed),
        }
    }

    /// (decrement, increment)
    pub fn counter_updates(&self) -> (Option<Uuid>, Option<Uuid>) {
        match *self {
            InfluencerVoteChange::Cast(id) => (None, Some(id)),
            InfluencerVoteChange::Withdrawn(id) => (Some(id), None),
            InfluencerVoteChange::Moved { from, to } => (Some(from), Some(to)),
        }
    }

    /// Influencer the device backs afterwards
    pub fn current_vote(&self) -> Option<Uuid> {
        self.counter_updates().1
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteCountsResponse {
    pub counts: HashMap<Uuid, i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteCountResponse {
    pub influencer_id: Uuid,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MyInfluencerVoteResponse {
    pub influencer_id: Option<Uuid>,
}

/// Pressed influencer's count after a toggle, plus where the device's vote now sits
#[derive(Debug, Clone, Serialize)]
pub struct ToggleInfluencerVoteResponse {
    pub influencer_id: Uuid,
    pub count: i64,
    pub my_vote: Option<Uuid>,
}
