// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod contact;
pub mod influencer;
pub mod influencer_vote;
pub mod report;
pub mod review;
pub mod visit;

pub use contact::*;
pub use influencer::*;
pub use influencer_vote::*;
pub use report::*;
pub use review::*;
pub use visit::*;
