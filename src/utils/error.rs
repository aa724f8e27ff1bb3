use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid input file {path}: {message}")]
    InputError { path: String, message: String },

    #[error("Failed to fetch {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("Search via {engine} failed: {message}")]
    SearchError { engine: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Storage,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrackerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackerError::HttpError(_)
            | TrackerError::FetchError { .. }
            | TrackerError::SearchError { .. } => ErrorCategory::Network,
            TrackerError::ConfigValidationError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TrackerError::InputError { .. } => ErrorCategory::Input,
            TrackerError::IoError(_) => ErrorCategory::Storage,
            TrackerError::SerializationError(_) => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check network connectivity and retry the run later",
            ErrorCategory::Configuration => {
                "Review the TOML configuration file and command line flags"
            }
            ErrorCategory::Input => {
                "Make sure the input file exists and is a JSON array of {name, core_rank, base_url?}"
            }
            ErrorCategory::Storage => "Check that the output directory is writable",
            ErrorCategory::Processing => "Re-run with --verbose to see which record failed",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::InputError { path, .. } => {
                format!("Could not load conferences from '{}'", path)
            }
            TrackerError::IoError(e) => format!("File system error: {}", e),
            TrackerError::ConfigValidationError { field, message } => {
                format!("Configuration problem ({}): {}", field, message)
            }
            TrackerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            TrackerError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
