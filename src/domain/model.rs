use serde::{Deserialize, Serialize};

/// Sentinel written wherever a field could not be determined.
pub const TBA: &str = "TBA";

/// One entry of the input conference list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceRecord {
    pub name: String,
    pub core_rank: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Raw date substrings pulled out of a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDates {
    pub cfp_deadline: Option<String>,
    pub abstract_deadline: Option<String>,
    pub conference_start: Option<String>,
    pub conference_end: Option<String>,
}

impl ExtractedDates {
    pub fn is_empty(&self) -> bool {
        self.cfp_deadline.is_none()
            && self.abstract_deadline.is_none()
            && self.conference_start.is_none()
            && self.conference_end.is_none()
    }

    /// Renders the conference window as `start - end`, `start`, or `TBA`.
    pub fn conference_dates(&self) -> String {
        match (&self.conference_start, &self.conference_end) {
            (Some(start), Some(end)) => format!("{} - {}", start, end),
            (Some(start), None) => start.clone(),
            _ => TBA.to_string(),
        }
    }
}

/// Best answer found for one conference in this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CfpResult {
    pub cfp_deadline: String,
    pub conference_dates: String,
    pub location: String,
    pub url: String,
    pub has_multiple_cycles: bool,
}

impl CfpResult {
    pub fn tba() -> Self {
        Self {
            cfp_deadline: TBA.to_string(),
            conference_dates: TBA.to_string(),
            location: TBA.to_string(),
            url: TBA.to_string(),
            has_multiple_cycles: false,
        }
    }

    pub fn has_deadline(&self) -> bool {
        self.cfp_deadline != TBA
    }
}

/// Page text plus the CFP links discovered while flattening it.
#[derive(Debug, Clone, Default)]
pub struct FetchedPage {
    pub url: String,
    pub text: String,
    pub cfp_links: Vec<String>,
}

/// Row of `cfp.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfpOutput {
    pub name: String,
    pub core_rank: String,
    pub cfp_deadline: String,
    pub cfp_url: String,
    pub note: String,
}

/// Row of `confdates.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOutput {
    pub name: String,
    pub location: String,
    pub conference_dates: String,
    pub conf_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct TrackerOutput {
    pub cfp: Vec<CfpOutput>,
    pub dates: Vec<DateOutput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conference_dates_rendering() {
        let mut dates = ExtractedDates::default();
        assert_eq!(dates.conference_dates(), "TBA");

        dates.conference_start = Some("10 June 2026".to_string());
        assert_eq!(dates.conference_dates(), "10 June 2026");

        dates.conference_end = Some("12 June 2026".to_string());
        assert_eq!(dates.conference_dates(), "10 June 2026 - 12 June 2026");
    }

    #[test]
    fn test_conference_record_without_base_url() {
        let record: ConferenceRecord =
            serde_json::from_str(r#"{"name": "OSDI", "core_rank": "A*"}"#).unwrap();
        assert_eq!(record.base_url, None);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("base_url"));
    }
}
