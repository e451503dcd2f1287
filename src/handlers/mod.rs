// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod contact;
pub mod device;
pub mod extract;
pub mod health;
pub mod image;
pub mod influencers;
pub mod reviews;
pub mod visits;
pub mod votes;

pub use admin::config as admin_config;
pub use contact::config as contact_config;
pub use extract::config as extract_config;
pub use health::config as health_config;
pub use image::config as image_config;
pub use influencers::config as influencers_config;
pub use reviews::config as reviews_config;
pub use visits::config as visits_config;
pub use votes::config as votes_config;
