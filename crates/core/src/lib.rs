//! Shared data model, configuration and error taxonomy for the SEM campaign
//! planner.

pub mod config;
pub mod error;
pub mod money;
pub mod types;

pub use config::CampaignConfig;
pub use error::{CampaignError, CampaignResult};
