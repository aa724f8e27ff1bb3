//! Keyword and format tables shared by extraction and the deadline check.
//!
//! Every table is matched against lower-cased text.

/// Lines announcing an abstract registration milestone.
pub const ABSTRACT_KEYWORDS: &[&str] = &[
    "abstract registration",
    "abstract submission",
    "abstract deadline",
    "abstract due",
    "abstracts due",
    "register abstract",
    "registration of abstract",
];

/// Lines announcing the paper submission deadline.
pub const DEADLINE_KEYWORDS: &[&str] = &[
    "submission deadline",
    "paper deadline",
    "paper submission",
    "full paper",
    "submissions due",
    "papers due",
    "submission due",
    "deadline",
    "due date",
    "submit by",
];

/// Lines introducing when the event itself happens.
pub const CONFERENCE_KEYWORDS: &[&str] = &[
    "conference dates",
    "conference date",
    "conference will be held",
    "will be held",
    "will take place",
    "takes place",
    "symposium dates",
    "workshop dates",
    "event dates",
    "held on",
];

/// Any of these anywhere in the page hints at several submission rounds.
pub const CYCLE_KEYWORDS: &[&str] = &[
    "cycle",
    "round",
    "deadline 1",
    "deadline 2",
    "spring",
    "fall",
    "summer",
    "winter",
];

/// `chrono` formats tried, in order, after a date substring is normalized.
///
/// `%B` also accepts the three-letter abbreviation when parsing. Weekday
/// prefixes, ordinal suffixes, commas and periods are stripped beforehand.
pub const DATE_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%B %d %Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
];

/// Lines of context considered after a conference-date cue, cue line included.
pub const CONFERENCE_WINDOW: usize = 4;

/// Only the head of a page is searched for a venue.
pub const LOCATION_SCAN_CHARS: usize = 5000;

/// Longer location captures are treated as prose, not a place name.
pub const MAX_LOCATION_CHARS: usize = 50;

pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
