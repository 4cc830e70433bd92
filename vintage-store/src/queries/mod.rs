//! Query modules split by concern.

pub mod claim;
pub mod invalidation;
pub mod matrix_crud;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width RFC 3339 UTC timestamp. Lexicographic order matches
/// chronological order, which the reaper's cutoff comparison relies on.
pub(crate) fn now_str() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}
