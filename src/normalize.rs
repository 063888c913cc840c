// 🧹 Normalization - Raw export text → target schema values
//
// Dates:  "2025-01-15 22:33:41.110092+00" → "2025-01-15"
// Scores: "43.00" → 43, "12.5" → 12.5, "" → null
// Winner: "true" / "TRUE" → true, anything else → false

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

// ============================================================================
// DATES
// ============================================================================

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp layouts that carry an explicit UTC offset
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

/// Timestamp layouts without an offset
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Outcome of normalizing a `played_at` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayedDate {
    /// Empty input
    Missing,

    /// Parsed into a calendar date
    Parsed(NaiveDate),

    /// Unparseable; first 10 characters kept verbatim
    BestEffort(String),
}

impl PlayedDate {
    /// `YYYY-MM-DD` (or the best-effort text), `None` when missing
    pub fn into_value(self) -> Option<String> {
        match self {
            PlayedDate::Missing => None,
            PlayedDate::Parsed(date) => Some(date.format(DATE_FORMAT).to_string()),
            PlayedDate::BestEffort(text) => Some(text),
        }
    }

    pub fn is_best_effort(&self) -> bool {
        matches!(self, PlayedDate::BestEffort(_))
    }
}

/// Normalize an exported timestamp to a calendar date
///
/// 1. Full timestamp, with the export's bare `+00` read as `+00:00`.
///    The date is taken in the timestamp's own offset.
/// 2. Otherwise the first 10 characters as `YYYY-MM-DD`.
/// 3. Otherwise warn and keep the first 10 characters as they are.
pub fn parse_date(raw: &str) -> PlayedDate {
    if raw.is_empty() {
        return PlayedDate::Missing;
    }

    if let Some(date) = parse_timestamp(raw) {
        return PlayedDate::Parsed(date);
    }

    let prefix: String = raw.chars().take(10).collect();
    if let Ok(date) = NaiveDate::parse_from_str(&prefix, DATE_FORMAT) {
        return PlayedDate::Parsed(date);
    }

    warn!(raw = %raw, "could not parse date, keeping first 10 characters");
    PlayedDate::BestEffort(prefix)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let expanded = match raw.strip_suffix("+00") {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_string(),
    };

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&expanded, format) {
            return Some(dt.date_naive());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&expanded) {
        return Some(dt.date_naive());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&expanded, format) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(&expanded, DATE_FORMAT).ok()
}

// ============================================================================
// SCORES
// ============================================================================

/// A normalized score: whole numbers stay integers in the output JSON
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Integer(i64),
    Decimal(f64),
}

/// Parse raw score text; empty, non-numeric and non-finite input → `None`
///
/// Missing scores are normal (forfeits, unscored games), so nothing is logged.
pub fn parse_score(raw: &str) -> Option<Score> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        Some(Score::Integer(value as i64))
    } else {
        Some(Score::Decimal(value))
    }
}

// ============================================================================
// WINNER FLAG
// ============================================================================

/// Only the literal `true` (any ASCII case) counts
pub fn parse_winner(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}
