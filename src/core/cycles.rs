use crate::core::keywords::{contains_any, CYCLE_KEYWORDS};

/// True when the page mentions more than one submission round.
pub fn detect_multiple_cycles(text: &str) -> bool {
    contains_any(&text.to_lowercase(), CYCLE_KEYWORDS)
}
