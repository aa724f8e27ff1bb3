pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TrackerConfig;

pub use adapters::{http::HttpFetcher, storage::LocalStorage};
pub use core::deadline::is_past_deadline;
pub use core::extraction::{analyze_page, extract};
pub use core::{engine::TrackerEngine, pipeline::CfpPipeline};
pub use utils::error::{Result, TrackerError};
