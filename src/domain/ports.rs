use crate::domain::model::{ConferenceRecord, FetchedPage, TrackerOutput};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_dir(&self) -> &str;
    fn cfp_filename(&self) -> &str;
    fn dates_filename(&self) -> &str;
    fn max_candidates(&self) -> usize;
    fn request_delay(&self) -> Duration;
    fn url_templates(&self) -> &[String];
    fn known_homepages(&self) -> &BTreeMap<String, String>;
}

/// Retrieves a page and flattens it to visible text.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Web search used to discover candidate CFP pages.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    fn is_enabled(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ConferenceRecord>>;
    async fn transform(&self, conferences: Vec<ConferenceRecord>) -> Result<TrackerOutput>;
    async fn load(&self, output: TrackerOutput) -> Result<Vec<String>>;
}
