// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: One repository per table group

pub mod contact_repository;
pub mod influencer_repository;
pub mod influencer_vote_repository;
pub mod report_repository;
pub mod review_repository;
pub mod visit_repository;

#[cfg(test)]
pub mod fixtures;

pub use contact_repository::*;
pub use influencer_repository::*;
pub use influencer_vote_repository::*;
pub use report_repository::*;
pub use review_repository::*;
pub use visit_repository::*;
