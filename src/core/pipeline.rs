//! Sequential CFP lookup: load conferences, resolve each one, write outputs.

use crate::core::candidates::{candidate_urls, search_query};
use crate::core::deadline::is_past_deadline;
use crate::core::extraction::analyze_page;
use crate::core::{ConfigProvider, PageFetcher, Pipeline, SearchProvider, Storage};
use crate::domain::model::{CfpOutput, CfpResult, ConferenceRecord, DateOutput, TrackerOutput};
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{validate_non_empty_string, validate_url};
use chrono::{DateTime, Datelike, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const MULTIPLE_CYCLES_NOTE: &str =
    "Multiple submission cycles detected; check the CFP page for other rounds";
pub const DEADLINE_PASSED_NOTE: &str = "Deadline has passed";

pub struct CfpPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    fetcher: Box<dyn PageFetcher>,
    search: Box<dyn SearchProvider>,
    now: DateTime<Utc>,
    network_calls: AtomicUsize,
}

impl<S: Storage, C: ConfigProvider> CfpPipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        fetcher: Box<dyn PageFetcher>,
        search: Box<dyn SearchProvider>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            storage,
            config,
            fetcher,
            search,
            now,
            network_calls: AtomicUsize::new(0),
        }
    }

    /// Sleeps for the politeness delay before every network call but the first.
    async fn pause(&self) {
        let delay = self.config.request_delay();
        if self.network_calls.fetch_add(1, Ordering::Relaxed) > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Candidate URLs for one edition, search results included.
    pub async fn candidates_for(&self, conference: &ConferenceRecord, year: i32) -> Vec<String> {
        let mut search_results = Vec::new();

        if self.search.is_enabled() {
            let query = search_query(conference, year);
            self.pause().await;
            match self.search.search(&query).await {
                Ok(results) => {
                    tracing::debug!(
                        "{} returned {} results for '{}'",
                        self.search.name(),
                        results.len(),
                        query
                    );
                    search_results = results;
                }
                Err(e) => tracing::warn!("Search for '{}' failed: {}", query, e),
            }
        }

        candidate_urls(
            conference,
            year,
            &search_results,
            self.config.url_templates(),
            self.config.known_homepages(),
        )
    }

    /// Tries the current edition, then the next one while deadlines are past.
    pub async fn resolve_conference(&self, conference: &ConferenceRecord) -> CfpResult {
        let current_year = self.now.year();
        let mut past_result: Option<CfpResult> = None;
        let mut partial_result: Option<CfpResult> = None;
        let mut tried: HashSet<String> = HashSet::new();

        for year in [current_year, current_year + 1] {
            let mut queue: VecDeque<String> =
                self.candidates_for(conference, year).await.into();
            let mut attempts = 0;

            while let Some(url) = queue.pop_front() {
                if attempts >= self.config.max_candidates() {
                    break;
                }
                if !tried.insert(url.clone()) {
                    continue;
                }
                attempts += 1;

                self.pause().await;
                let page = match self.fetcher.fetch(&url).await {
                    Ok(page) => page,
                    Err(e) => {
                        tracing::warn!("{} ({}): skipping {}: {}", conference.name, year, url, e);
                        continue;
                    }
                };

                for link in page.cfp_links.iter().rev() {
                    if !tried.contains(link) {
                        queue.push_front(link.clone());
                    }
                }

                let result = analyze_page(&page.text, &page.url, self.now);
                if !result.has_deadline() {
                    tracing::debug!("{} ({}): no deadline on {}", conference.name, year, url);
                    partial_result.get_or_insert(result);
                    continue;
                }

                if !is_past_deadline(&result.cfp_deadline, self.now) {
                    tracing::info!(
                        "{}: deadline {} found on {}",
                        conference.name,
                        result.cfp_deadline,
                        url
                    );
                    return result;
                }

                tracing::debug!(
                    "{} ({}): deadline {} on {} has passed",
                    conference.name,
                    year,
                    result.cfp_deadline,
                    url
                );
                past_result.get_or_insert(result);
            }
        }

        match past_result.or(partial_result) {
            Some(result) => {
                tracing::info!(
                    "{}: settling for '{}' from {}",
                    conference.name,
                    result.cfp_deadline,
                    result.url
                );
                result
            }
            None => {
                tracing::warn!("{}: no usable page found", conference.name);
                CfpResult::tba()
            }
        }
    }

    /// Candidate URLs per edition without fetching any page.
    pub async fn plan(&self, conferences: &[ConferenceRecord]) -> Vec<(String, i32, Vec<String>)> {
        let current_year = self.now.year();
        let mut plan = Vec::new();
        for conference in conferences {
            for year in [current_year, current_year + 1] {
                let urls = self.candidates_for(conference, year).await;
                plan.push((conference.name.clone(), year, urls));
            }
        }
        plan
    }

    fn output_path(&self, filename: &str) -> String {
        format!("{}/{}", self.config.output_dir().trim_end_matches('/'), filename)
    }
}

fn validate_record(record: &ConferenceRecord) -> Result<()> {
    validate_non_empty_string("name", &record.name)?;
    if let Some(base_url) = &record.base_url {
        validate_url(&format!("{}.base_url", record.name), base_url)?;
    }
    Ok(())
}

pub fn build_note(result: &CfpResult, now: DateTime<Utc>) -> String {
    let mut notes = Vec::new();
    if result.has_multiple_cycles {
        notes.push(MULTIPLE_CYCLES_NOTE);
    }
    if is_past_deadline(&result.cfp_deadline, now) {
        notes.push(DEADLINE_PASSED_NOTE);
    }
    notes.join("; ")
}

pub fn cfp_output(
    conference: &ConferenceRecord,
    result: &CfpResult,
    now: DateTime<Utc>,
) -> CfpOutput {
    CfpOutput {
        name: conference.name.clone(),
        core_rank: conference.core_rank.clone(),
        cfp_deadline: result.cfp_deadline.clone(),
        cfp_url: result.url.clone(),
        note: build_note(result, now),
    }
}

pub fn date_output(conference: &ConferenceRecord, result: &CfpResult) -> DateOutput {
    DateOutput {
        name: conference.name.clone(),
        location: result.location.clone(),
        conference_dates: result.conference_dates.clone(),
        conf_url: result.url.clone(),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CfpPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ConferenceRecord>> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading conferences from {}", input_path);

        let data = self
            .storage
            .read_file(input_path)
            .await
            .map_err(|e| TrackerError::InputError {
                path: input_path.to_string(),
                message: e.to_string(),
            })?;

        let conferences: Vec<ConferenceRecord> =
            serde_json::from_slice(&data).map_err(|e| TrackerError::InputError {
                path: input_path.to_string(),
                message: e.to_string(),
            })?;

        for record in &conferences {
            validate_record(record).map_err(|e| TrackerError::InputError {
                path: input_path.to_string(),
                message: e.to_string(),
            })?;
        }

        Ok(conferences)
    }

    async fn transform(&self, conferences: Vec<ConferenceRecord>) -> Result<TrackerOutput> {
        let mut output = TrackerOutput::default();
        let total = conferences.len();

        for (index, conference) in conferences.iter().enumerate() {
            tracing::info!("[{}/{}] Looking up {}", index + 1, total, conference.name);
            let result = self.resolve_conference(conference).await;

            output.cfp.push(cfp_output(conference, &result, self.now));
            output.dates.push(date_output(conference, &result));
        }

        Ok(output)
    }

    async fn load(&self, output: TrackerOutput) -> Result<Vec<String>> {
        let cfp_path = self.output_path(self.config.cfp_filename());
        let dates_path = self.output_path(self.config.dates_filename());

        let cfp_json = serde_json::to_string_pretty(&output.cfp)?;
        self.storage.write_file(&cfp_path, cfp_json.as_bytes()).await?;
        tracing::debug!("Wrote {} CFP records to {}", output.cfp.len(), cfp_path);

        let dates_json = serde_json::to_string_pretty(&output.dates)?;
        self.storage
            .write_file(&dates_path, dates_json.as_bytes())
            .await?;
        tracing::debug!("Wrote {} date records to {}", output.dates.len(), dates_path);

        Ok(vec![cfp_path, dates_path])
    }
}
