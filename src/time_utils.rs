// SPDX-License-Identifier: MIT

//! Shared helpers for date/time formatting and day bucketing.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The UTC calendar day of a timestamp. Time of day is discarded; all
/// duplicate-submission and streak logic operates on this bucket.
pub fn utc_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// Canonical string form of a day bucket, used in completion document IDs.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
