pub mod candidates;
pub mod cycles;
pub mod dates;
pub mod deadline;
pub mod engine;
pub mod extraction;
pub mod keywords;
pub mod location;
pub mod pipeline;

pub use crate::domain::model::{CfpResult, ConferenceRecord, ExtractedDates, TrackerOutput};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, SearchProvider, Storage};
pub use crate::utils::error::Result;
