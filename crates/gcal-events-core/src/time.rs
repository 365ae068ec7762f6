//! Timestamp helpers.
//!
//! Event times travel to the Calendar API as RFC 3339 strings that keep the
//! local offset they were scheduled in (for example
//! `2017-10-05T08:00:00-05:00`), so the offset is never normalized to UTC.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, TimeZone};
use thiserror::Error;

/// Wire format for event timestamps: whole seconds plus a `+HH:MM` offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Errors produced while handling timestamps.
#[derive(Debug, Error, PartialEq)]
pub enum TimeError {
    /// The input could not be parsed as an RFC 3339 timestamp.
    #[error("invalid timestamp '{input}': {reason}")]
    Parse {
        /// The rejected input.
        input: String,
        /// Why chrono rejected it.
        reason: String,
    },

    /// Date arithmetic left the representable range.
    #[error("timestamp out of range")]
    OutOfRange,

    /// A schedule asked for more occurrences than allowed.
    #[error("schedule has {count} occurrences, at most {max} are allowed")]
    TooManyOccurrences {
        /// Requested occurrences.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },
}

/// Formats a timestamp for the Calendar API, keeping its offset.
pub fn format_timestamp<Tz>(dt: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses an RFC 3339 timestamp, keeping its offset.
pub fn parse_timestamp(input: &str) -> Result<DateTime<FixedOffset>, TimeError> {
    DateTime::parse_from_rfc3339(input.trim()).map_err(|e| TimeError::Parse {
        input: input.to_string(),
        reason: e.to_string(),
    })
}
