//! Turns flattened page text into deadline and conference-date fields.
//!
//! Lines are classified by cue keywords into three pools: abstract deadlines,
//! submission deadlines and conference dates. Deadline pools keep every
//! date-shaped substring they see; conference dates come from the first cue
//! line whose short forward window holds a date. The current time is always
//! supplied by the caller.

use crate::core::cycles::detect_multiple_cycles;
use crate::core::dates::{find_date_substrings, find_dates_with_ranges, select_deadline};
use crate::core::keywords::{
    contains_any, ABSTRACT_KEYWORDS, CONFERENCE_KEYWORDS, CONFERENCE_WINDOW, DEADLINE_KEYWORDS,
};
use crate::core::location::extract_location;
use crate::domain::model::{CfpResult, ExtractedDates, TBA};
use chrono::{DateTime, Utc};

const DASH_VARIANTS: [char; 6] = [
    '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}', '\u{2212}',
];

pub fn normalize_dashes(text: &str) -> String {
    text.replace(DASH_VARIANTS, "-")
}

/// First two dates of a conference-cue window, the second only if distinct.
fn conference_window(lines: &[&str], cue_index: usize) -> (Option<String>, Option<String>) {
    let end = (cue_index + CONFERENCE_WINDOW).min(lines.len());
    let window = lines[cue_index..end].join("\n");
    let mut dates = find_dates_with_ranges(&window).into_iter();

    let start = dates.next();
    let finish = dates.next().filter(|second| Some(second) != start.as_ref());
    (start, finish)
}

pub fn extract(text: &str, now: DateTime<Utc>) -> ExtractedDates {
    let normalized = normalize_dashes(text);
    let lines: Vec<&str> = normalized.lines().collect();

    let mut deadline_pool: Vec<String> = Vec::new();
    let mut abstract_pool: Vec<String> = Vec::new();
    let mut extracted = ExtractedDates::default();

    for (index, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();

        if contains_any(&lower, ABSTRACT_KEYWORDS) {
            abstract_pool.extend(find_date_substrings(line));
        } else if contains_any(&lower, DEADLINE_KEYWORDS) {
            deadline_pool.extend(find_date_substrings(line));
        }

        if extracted.conference_start.is_none() && contains_any(&lower, CONFERENCE_KEYWORDS) {
            let (start, finish) = conference_window(&lines, index);
            if start.is_some() {
                extracted.conference_start = start;
                extracted.conference_end = finish;
            }
        }
    }

    let today = now.date_naive();
    extracted.cfp_deadline = select_deadline(&deadline_pool, today);
    extracted.abstract_deadline = select_deadline(&abstract_pool, today);

    if extracted.cfp_deadline.is_none() {
        extracted.cfp_deadline = extracted.abstract_deadline.clone();
    }

    tracing::trace!(
        deadlines = deadline_pool.len(),
        abstracts = abstract_pool.len(),
        "classified date candidates"
    );

    extracted
}

/// Runs every page-level heuristic and folds the results into a [`CfpResult`].
pub fn analyze_page(text: &str, url: &str, now: DateTime<Utc>) -> CfpResult {
    let dates = extract(text, now);

    CfpResult {
        cfp_deadline: dates.cfp_deadline.clone().unwrap_or_else(|| TBA.to_string()),
        conference_dates: dates.conference_dates(),
        location: extract_location(text),
        url: url.to_string(),
        has_multiple_cycles: detect_multiple_cycles(text),
    }
}
