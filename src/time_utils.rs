// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};

/// Current unix time in seconds.
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// Half-open `[after, before)` window in unix seconds, as the list endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub year: i32,
    pub after: i64,
    pub before: i64,
}

impl YearRange {
    /// Window covering a calendar year in the given timezone.
    pub fn for_year<Tz: TimeZone>(tz: &Tz, year: i32) -> Self {
        Self {
            year,
            after: start_of_year(tz, year),
            before: start_of_year(tz, year + 1),
        }
    }

    /// The current calendar year in local time.
    pub fn current() -> Self {
        Self::for_year(&Local, Local::now().year())
    }
}

/// Midnight January 1st of `year` in `tz`, as unix seconds.
fn start_of_year<Tz: TimeZone>(tz: &Tz, year: i32) -> i64 {
    let midnight = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();

    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

/// Render a unix timestamp in local time, for operator-facing log lines.
pub fn format_local(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| unix_seconds.to_string())
}
