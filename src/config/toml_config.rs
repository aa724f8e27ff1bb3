use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::adapters::search::SEARCH_ENGINES;
use crate::core::candidates::expand_template;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number,
    validate_url, Validate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub tracker: TrackerSection,
    pub http: HttpSection,
    pub search: SearchSection,
    pub templates: TemplateSection,
    pub known_homepages: KnownHomepages,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSection {
    pub input_path: String,
    pub output_dir: String,
    pub cfp_filename: String,
    pub dates_filename: String,
    pub max_candidates: usize,
    pub request_delay_ms: u64,
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            input_path: "data/conferences.json".to_string(),
            output_dir: "generated".to_string(),
            cfp_filename: "cfp.json".to_string(),
            dates_filename: "confdates.json".to_string(),
            max_candidates: 10,
            request_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub engine: String,
    pub endpoint: Option<String>,
    pub max_results: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            engine: "duckduckgo".to_string(),
            endpoint: None,
            max_results: 5,
        }
    }
}

/// URL guesses tried after search results. Placeholders: `{slug}`, `{year}`, `{yy}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSection {
    pub urls: Vec<String>,
}

impl Default for TemplateSection {
    fn default() -> Self {
        Self {
            urls: vec![
                "https://{slug}{year}.org/".to_string(),
                "https://www.{slug}.org/{year}/".to_string(),
                "https://{slug}.org/{year}/cfp".to_string(),
                "https://conf.researchr.org/home/{slug}-{year}".to_string(),
            ],
        }
    }
}

/// Homepages used when an input record carries no `base_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownHomepages(pub BTreeMap<String, String>);

impl Default for KnownHomepages {
    fn default() -> Self {
        let known = [
            ("OSDI", "https://www.usenix.org/conference/osdi"),
            ("SOSP", "https://www.sosp.org"),
            ("ASPLOS", "https://www.asplos-conference.org"),
            ("EuroSys", "https://www.eurosys.org"),
            ("USENIX ATC", "https://www.usenix.org/conference/atc"),
            ("FAST", "https://www.usenix.org/conference/fast"),
        ];
        Self(
            known
                .into_iter()
                .map(|(name, url)| (name.to_string(), url.to_string()))
                .collect(),
        )
    }
}

impl TrackerConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("tracker.input_path", &self.tracker.input_path)?;
        validate_path("tracker.output_dir", &self.tracker.output_dir)?;
        validate_path("tracker.cfp_filename", &self.tracker.cfp_filename)?;
        validate_path("tracker.dates_filename", &self.tracker.dates_filename)?;
        validate_positive_number("tracker.max_candidates", self.tracker.max_candidates, 1)?;

        validate_non_empty_string("http.user_agent", &self.http.user_agent)?;
        validate_positive_number("http.timeout_seconds", self.http.timeout_seconds as usize, 1)?;

        validate_one_of("search.engine", &self.search.engine, SEARCH_ENGINES)?;
        if let Some(endpoint) = &self.search.endpoint {
            validate_url("search.endpoint", endpoint)?;
        }

        for template in &self.templates.urls {
            validate_url("templates.urls", &expand_template(template, "conf", 2000))?;
        }

        for (name, url) in &self.known_homepages.0 {
            validate_non_empty_string("known_homepages", name)?;
            validate_url(&format!("known_homepages.{}", name), url)?;
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }
}

impl ConfigProvider for TrackerConfig {
    fn input_path(&self) -> &str {
        &self.tracker.input_path
    }

    fn output_dir(&self) -> &str {
        &self.tracker.output_dir
    }

    fn cfp_filename(&self) -> &str {
        &self.tracker.cfp_filename
    }

    fn dates_filename(&self) -> &str {
        &self.tracker.dates_filename
    }

    fn max_candidates(&self) -> usize {
        self.tracker.max_candidates
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.tracker.request_delay_ms)
    }

    fn url_templates(&self) -> &[String] {
        &self.templates.urls
    }

    fn known_homepages(&self) -> &BTreeMap<String, String> {
        &self.known_homepages.0
    }
}

impl Validate for TrackerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
