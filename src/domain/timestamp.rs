use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

const COMPACT: &str = "%Y-%m-%d %H%M";
const COLON: &str = "%Y-%m-%d %H:%M";

// chrono skips whitespace around numeric fields, so the exact shape is
// checked before parsing.
static COMPACT_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{4}$").expect("pattern is valid")
});
static COLON_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}$").expect("pattern is valid")
});

/// Which textual timestamp layouts are accepted.
///
/// Timestamps have minute precision and a 24-hour clock, e.g.
/// `2025-11-14 1030` (compact) or `2025-11-14 10:30` (colon).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatetimeLayouts {
    /// Accept both `YYYY-MM-DD HHMM` and `YYYY-MM-DD HH:MM`.
    #[default]
    Both,
    /// Accept only `YYYY-MM-DD HHMM`.
    Compact,
}

impl DatetimeLayouts {
    /// Parse `s` with the accepted layout it has the shape of.
    ///
    /// Returns `None` if no accepted layout matches the whole string exactly,
    /// or if the date or time does not exist.
    #[must_use]
    pub fn parse(self, s: &str) -> Option<NaiveDateTime> {
        let format = if COMPACT_SHAPE.is_match(s) {
            COMPACT
        } else if self == Self::Both && COLON_SHAPE.is_match(s) {
            COLON
        } else {
            return None;
        };
        NaiveDateTime::parse_from_str(s, format).ok()
    }
}
