use crate::config::toml_config::TrackerConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "sysconf-tracker")]
#[command(about = "Finds CFP deadlines, dates and venues of systems conferences")]
pub struct CliConfig {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// JSON list of conferences to look up
    #[arg(long)]
    pub input: Option<String>,

    /// Directory receiving cfp.json and confdates.json
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Web search engine: duckduckgo, dblp or none
    #[arg(long)]
    pub search_engine: Option<String>,

    /// Politeness delay between network calls, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Candidate URLs tried per conference edition
    #[arg(long)]
    pub max_candidates: Option<usize>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Print candidate URLs without fetching any page
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    /// Loads the TOML file (or defaults) and applies command line overrides.
    pub fn tracker_config(&self) -> Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::from_file(path)?,
            None => TrackerConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TrackerConfig) {
        if let Some(input) = &self.input {
            config.tracker.input_path = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.tracker.output_dir = output_dir.clone();
        }
        if let Some(engine) = &self.search_engine {
            config.search.engine = engine.clone();
        }
        if let Some(delay_ms) = self.delay_ms {
            config.tracker.request_delay_ms = delay_ms;
        }
        if let Some(max_candidates) = self.max_candidates {
            config.tracker.max_candidates = max_candidates;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = CliConfig::parse_from(["sysconf-tracker"]);
        let config = cli.tracker_config().unwrap();

        assert_eq!(config.input_path(), "data/conferences.json");
        assert_eq!(config.output_dir(), "generated");
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = CliConfig::parse_from([
            "sysconf-tracker",
            "--input",
            "in.json",
            "--search-engine",
            "none",
            "--delay-ms",
            "0",
            "--max-candidates",
            "4",
        ]);
        let config = cli.tracker_config().unwrap();

        assert_eq!(config.input_path(), "in.json");
        assert_eq!(config.search.engine, "none");
        assert_eq!(config.request_delay().as_millis(), 0);
        assert_eq!(config.max_candidates(), 4);
    }
}
