//! Ordered candidate URLs for one conference edition.
//!
//! Priority: explicit or known homepage, its year-substituted variant,
//! search results, then templated guesses. Only http(s) URLs survive and each
//! URL appears once.

use crate::domain::model::ConferenceRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use url::Url;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit run pattern"));

/// Lower-cased alphanumerics of the conference name, e.g. `USENIX ATC` -> `usenixatc`.
pub fn slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn search_query(conference: &ConferenceRecord, year: i32) -> String {
    format!("{} {} call for papers", conference.name, year)
}

fn replace_years(s: &str, year: i32) -> String {
    DIGIT_RUN
        .replace_all(s, |caps: &regex::Captures| {
            let run = &caps[0];
            if run.len() == 4 && run.starts_with("20") {
                year.to_string()
            } else {
                run.to_string()
            }
        })
        .into_owned()
}

/// Rewrites every standalone `20xx` in the host and path to `year`.
///
/// Returns `None` when the URL is invalid or would not change.
pub fn substitute_year(url: &str, year: i32) -> Option<String> {
    let original = Url::parse(url).ok()?;
    let mut rewritten = original.clone();

    if let Some(host) = original.host_str() {
        let new_host = replace_years(host, year);
        if new_host != host {
            rewritten.set_host(Some(&new_host)).ok()?;
        }
    }
    let new_path = replace_years(original.path(), year);
    rewritten.set_path(&new_path);

    (rewritten != original).then(|| rewritten.to_string())
}

pub fn expand_template(template: &str, name: &str, year: i32) -> String {
    template
        .replace("{slug}", &slug(name))
        .replace("{year}", &year.to_string())
        .replace("{yy}", &format!("{:02}", year.rem_euclid(100)))
}

/// Explicit base URL, else the known homepage for this conference name.
pub fn homepage_for(
    conference: &ConferenceRecord,
    known_homepages: &BTreeMap<String, String>,
) -> Option<String> {
    conference
        .base_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| known_homepages.get(&conference.name).cloned())
}

fn normalize_candidate(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

pub fn candidate_urls(
    conference: &ConferenceRecord,
    year: i32,
    search_results: &[String],
    templates: &[String],
    known_homepages: &BTreeMap<String, String>,
) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();

    if let Some(homepage) = homepage_for(conference, known_homepages) {
        let variant = substitute_year(&homepage, year);
        ordered.push(homepage);
        ordered.extend(variant);
    }
    ordered.extend(search_results.iter().cloned());
    ordered.extend(
        templates
            .iter()
            .map(|template| expand_template(template, &conference.name, year)),
    );

    let mut seen = HashSet::new();
    ordered
        .iter()
        .filter_map(|url| normalize_candidate(url))
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
