use crate::core::dates::parse_date;
use chrono::{DateTime, Utc};

/// Whether `deadline` lies before `now`'s calendar day.
///
/// Strings that do not parse (including `TBA`) are never considered past.
pub fn is_past_deadline(deadline: &str, now: DateTime<Utc>) -> bool {
    match parse_date(deadline) {
        Some(date) => date < now.date_naive(),
        None => false,
    }
}
