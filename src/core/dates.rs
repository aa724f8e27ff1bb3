//! Date-shaped substring scanning and the flexible date parser.

use crate::core::keywords::DATE_FORMATS;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const ORDINAL: &str = r"(?:st|nd|rd|th)?";

static DAY_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b\d{{1,2}}{ORDINAL}\s+{MONTH}\b\.?,?\s+\d{{4}}\b"))
        .expect("day-month-year pattern")
});

static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b{MONTH}\b\.?\s+\d{{1,2}}{ORDINAL},?\s+\d{{4}}\b"))
        .expect("month-day-year pattern")
});

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}[-/]\d{1,2}[-/]\d{1,2}\b").expect("iso date pattern"));

static DAY_RANGE_MONTH_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}}){ORDINAL}\s*-\s*(\d{{1,2}}){ORDINAL}\s+({MONTH})\b\.?,?\s+(\d{{4}})\b"
    ))
    .expect("day range pattern")
});

static MONTH_DAY_RANGE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH})\b\.?\s+(\d{{1,2}}){ORDINAL}\s*-\s*(\d{{1,2}}){ORDINAL},?\s+(\d{{4}})\b"
    ))
    .expect("month day range pattern")
});

static DAY_MONTH_RANGE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}}){ORDINAL}\s+({MONTH})\b\.?\s*-\s*(\d{{1,2}}){ORDINAL}\s+({MONTH})\b\.?,?\s+(\d{{4}})\b"
    ))
    .expect("day month range pattern")
});

static MONTH_DAY_MONTH_RANGE_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTH})\b\.?\s+(\d{{1,2}}){ORDINAL}\s*-\s*({MONTH})\b\.?\s+(\d{{1,2}}){ORDINAL},?\s+(\d{{4}})\b"
    ))
    .expect("month day month range pattern")
});

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("ordinal pattern"));

static WEEKDAY_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").expect("weekday pattern")
});

static SEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsept\b").expect("sept pattern"));

/// A matched region of text and the date strings it stands for.
#[derive(Debug, Clone)]
struct DateSpan {
    start: usize,
    end: usize,
    dates: Vec<String>,
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn single_date_spans(text: &str) -> Vec<DateSpan> {
    [&*DAY_MONTH_YEAR, &*MONTH_DAY_YEAR, &*ISO_DATE]
        .into_iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| DateSpan {
            start: m.start(),
            end: m.end(),
            dates: vec![collapse_whitespace(m.as_str())],
        })
        .collect()
}

fn range_spans(text: &str) -> Vec<DateSpan> {
    let mut spans = Vec::new();

    for caps in DAY_RANGE_MONTH_YEAR.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (first, last, month, year) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        spans.push(DateSpan {
            start: whole.start(),
            end: whole.end(),
            dates: vec![
                format!("{} {} {}", first, month, year),
                format!("{} {} {}", last, month, year),
            ],
        });
    }

    for caps in MONTH_DAY_RANGE_YEAR.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (month, first, last, year) = (&caps[1], &caps[2], &caps[3], &caps[4]);
        spans.push(DateSpan {
            start: whole.start(),
            end: whole.end(),
            dates: vec![
                format!("{} {}, {}", month, first, year),
                format!("{} {}, {}", month, last, year),
            ],
        });
    }

    for caps in DAY_MONTH_RANGE_YEAR.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (first, first_month, last, last_month, year) =
            (&caps[1], &caps[2], &caps[3], &caps[4], &caps[5]);
        spans.push(DateSpan {
            start: whole.start(),
            end: whole.end(),
            dates: vec![
                format!("{} {} {}", first, first_month, year),
                format!("{} {} {}", last, last_month, year),
            ],
        });
    }

    for caps in MONTH_DAY_MONTH_RANGE_YEAR.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (first_month, first, last_month, last, year) =
            (&caps[1], &caps[2], &caps[3], &caps[4], &caps[5]);
        spans.push(DateSpan {
            start: whole.start(),
            end: whole.end(),
            dates: vec![
                format!("{} {}, {}", first_month, first, year),
                format!("{} {}, {}", last_month, last, year),
            ],
        });
    }

    spans
}

/// Orders spans by position and drops any that overlap an earlier one.
/// On equal start the longer span wins.
fn resolve_overlaps(mut spans: Vec<DateSpan>) -> Vec<String> {
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut taken_until = 0;
    let mut dates = Vec::new();
    for span in spans {
        if span.start < taken_until {
            continue;
        }
        taken_until = span.end;
        dates.extend(span.dates);
    }
    dates
}

/// Every date-shaped substring in `text`, in document order.
pub fn find_date_substrings(text: &str) -> Vec<String> {
    resolve_overlaps(single_date_spans(text))
}

/// Like [`find_date_substrings`], but a range such as `10-12 June 2026` or
/// `June 30 - July 2, 2026` expands to both of its ends.
pub fn find_dates_with_ranges(text: &str) -> Vec<String> {
    let mut spans = range_spans(text);
    spans.extend(single_date_spans(text));
    resolve_overlaps(spans)
}

fn normalize_for_parsing(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_weekday = WEEKDAY_PREFIX.replace(trimmed, "");
    let without_ordinals = ORDINAL_SUFFIX.replace_all(&without_weekday, "$1");
    let without_sept = SEPT.replace_all(&without_ordinals, "sep");
    collapse_whitespace(&without_sept.replace([',', '.'], " "))
}

/// Parses a free-form date string with the shared format table.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let normalized = normalize_for_parsing(raw);
    if normalized.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
}

/// Earliest candidate on or after `today`; otherwise the last raw mention.
pub fn select_deadline(candidates: &[String], today: NaiveDate) -> Option<String> {
    candidates
        .iter()
        .filter_map(|raw| parse_date(raw).map(|date| (date, raw)))
        .filter(|(date, _)| *date >= today)
        .min_by_key(|(date, _)| *date)
        .map(|(_, raw)| raw.clone())
        .or_else(|| candidates.last().cloned())
}
