// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Business logic plus the pure helpers it relies on

pub mod cache;
pub mod contact_service;
pub mod day_key;
pub mod image_proxy;
pub mod image_url;
pub mod influencer_service;
pub mod influencer_vote_service;
pub mod price_range;
pub mod rate_limit;
pub mod reel_embed;
pub mod report_service;
pub mod review_service;
pub mod visit_service;

pub use cache::{start_cleanup_task, CachedImage, ImageCache};
pub use contact_service::ContactService;
pub use image_proxy::ImageProxyClient;
pub use influencer_service::InfluencerService;
pub use influencer_vote_service::InfluencerVoteService;
pub use rate_limit::{start_prune_task, WriteLimiter};
pub use report_service::ReportService;
pub use review_service::ReviewService;
pub use visit_service::VisitService;
