// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End time of the program currently airing.
//!
//! The box reports `CurrentProgram.EndTime` in one of several formats
//! depending on firmware:
//!
//! - ISO 8601 with timezone: `"2024-01-15T21:10:00+01:00"`
//! - ISO 8601 without timezone: `"2024-01-15T21:10:00"` (host local time)
//! - Unix epoch seconds: `1705349400` or `"1705349400"`
//! - Unix epoch milliseconds: `1705349400000` or `"1705349400000"`
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use chrono::{TimeZone, Utc};
//! use labox_lib::types::ProgramEndTime;
//!
//! let end: ProgramEndTime = "2024-01-15T21:10:00Z".parse().unwrap();
//! let now = Utc.with_ymd_and_hms(2024, 1, 15, 21, 0, 0).unwrap();
//!
//! assert_eq!(end.remaining(now), Some(Duration::from_secs(600)));
//! ```

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Error returned when an end time cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTimeParseError {
    input: String,
}

impl EndTimeParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl std::fmt::Display for EndTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to parse end time: '{}' (expected ISO 8601 or Unix epoch)",
            self.input
        )
    }
}

impl std::error::Error for EndTimeParseError {}

/// Instant at which the current program is expected to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProgramEndTime(DateTime<Utc>);

impl ProgramEndTime {
    /// Wraps an instant.
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Parses the `EndTime` field as found in a status response.
    ///
    /// Accepts JSON numbers (epoch) and strings. Returns `None` for anything
    /// else or for unparseable input.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().and_then(Self::from_epoch),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Returns the instant in UTC.
    #[must_use]
    pub const fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns the time left until the end, or `None` if it already passed.
    ///
    /// An end time equal to `now` yields a zero duration.
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        (self.0 - now).to_std().ok()
    }

    /// Interprets an epoch value in seconds or milliseconds.
    fn from_epoch(timestamp: i64) -> Option<Self> {
        if timestamp < 0 {
            return None;
        }

        // Seconds have at most 10 digits until year 2286
        let datetime = if timestamp > 9_999_999_999 {
            Utc.timestamp_millis_opt(timestamp).single()?
        } else {
            Utc.timestamp_opt(timestamp, 0).single()?
        };
        Some(Self(datetime))
    }

    fn parse_naive(s: &str) -> Option<Self> {
        let formats = [
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ];

        formats.iter().find_map(|fmt| {
            let naive = NaiveDateTime::parse_from_str(s, fmt).ok()?;
            let local = Local.from_local_datetime(&naive).earliest()?;
            Some(Self(local.with_timezone(&Utc)))
        })
    }
}

impl FromStr for ProgramEndTime {
    type Err = EndTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return s
                .parse()
                .ok()
                .and_then(Self::from_epoch)
                .ok_or_else(|| EndTimeParseError::new(s));
        }

        if let Ok(datetime) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(datetime.with_timezone(&Utc)));
        }

        Self::parse_naive(s).ok_or_else(|| EndTimeParseError::new(s))
    }
}
