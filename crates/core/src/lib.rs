//! Core domain types, configuration, and error handling for Campaign Tracker.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{TrackerError, TrackerResult};
pub use types::{CampaignRecord, Dataset, DatasetSource, DerivedRecord, GroupBy};
