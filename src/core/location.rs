use crate::core::keywords::{LOCATION_SCAN_CHARS, MAX_LOCATION_CHARS};
use crate::domain::model::TBA;
use once_cell::sync::Lazy;
use regex::Regex;

const PLACE: &str = r"(\p{Lu}[\p{L}.'\-]*(?:,?[ \t]+\p{Lu}[\p{L}.'\-]*)*)";

/// Venue patterns, most specific first. Keywords are case-insensitive, the
/// captured place must start with a capital letter.
static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(&format!(
            r"(?i:held|takes?[ \t]+place|hosted|located)\s+(?i:in)\s+{PLACE}"
        ))
        .expect("held-in pattern"),
        Regex::new(r"(?i:location|venue|city)[ \t]*:[ \t]*(\p{Lu}[^\n]*)").expect("venue pattern"),
    ]
});

fn head(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Venue phrase from the top of the page, or `TBA`.
pub fn extract_location(text: &str) -> String {
    let scanned = head(text, LOCATION_SCAN_CHARS);

    for pattern in LOCATION_PATTERNS.iter() {
        let Some(caps) = pattern.captures(scanned) else {
            continue;
        };
        let place = caps
            .get(1)
            .map(|m| m.as_str().trim().trim_end_matches(['.', ',']).trim())
            .unwrap_or_default();
        if !place.is_empty() && place.chars().count() < MAX_LOCATION_CHARS {
            return place.to_string();
        }
    }

    TBA.to_string()
}
