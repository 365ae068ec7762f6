//! Fixed-interval schedules.
//!
//! A [`RecurringSchedule`] expands into a finite list of start times, each
//! `interval_days` after the previous one. Expansion is a pure function of
//! the schedule value.

use chrono::{DateTime, Duration, FixedOffset};

use crate::event::{EventDescriptor, EventTemplate};
use crate::time::TimeError;

/// Default number of events in a batch.
pub const DEFAULT_EVENT_COUNT: usize = 6;

/// Default spacing between events, in days.
pub const DEFAULT_INTERVAL_DAYS: i64 = 14;

/// Default first start time.
pub const DEFAULT_START: &str = "2017-10-05T08:00:00-05:00";

/// Upper bound on the number of occurrences a schedule may expand to.
pub const MAX_EVENT_COUNT: usize = 1000;

/// A start time repeated `event_count` times, `interval_days` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurringSchedule {
    /// First occurrence.
    pub start: DateTime<FixedOffset>,
    /// Total number of occurrences, including the first.
    pub event_count: usize,
    /// Days between consecutive occurrences.
    pub interval_days: i64,
}

impl RecurringSchedule {
    /// Creates a schedule with the default count and interval.
    pub fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            event_count: DEFAULT_EVENT_COUNT,
            interval_days: DEFAULT_INTERVAL_DAYS,
        }
    }

    /// Sets the number of occurrences.
    pub fn with_event_count(mut self, count: usize) -> Self {
        self.event_count = count;
        self
    }

    /// Sets the spacing in days.
    pub fn with_interval_days(mut self, days: i64) -> Self {
        self.interval_days = days;
        self
    }

    /// Returns every start time in order.
    ///
    /// The count and the last occurrence are checked before anything is
    /// allocated.
    pub fn occurrences(&self) -> Result<Vec<DateTime<FixedOffset>>, TimeError> {
        if self.event_count > MAX_EVENT_COUNT {
            return Err(TimeError::TooManyOccurrences {
                count: self.event_count,
                max: MAX_EVENT_COUNT,
            });
        }

        let step = Duration::try_days(self.interval_days).ok_or(TimeError::OutOfRange)?;
        let last_offset = i32::try_from(self.event_count.saturating_sub(1))
            .ok()
            .and_then(|steps| step.checked_mul(steps))
            .ok_or(TimeError::OutOfRange)?;
        self.start
            .checked_add_signed(last_offset)
            .ok_or(TimeError::OutOfRange)?;

        let mut current = self.start;
        let mut out = Vec::with_capacity(self.event_count);

        for index in 0..self.event_count {
            if index > 0 {
                current = current
                    .checked_add_signed(step)
                    .ok_or(TimeError::OutOfRange)?;
            }
            out.push(current);
        }

        Ok(out)
    }

    /// Instantiates `template` at every occurrence.
    pub fn build_events(&self, template: &EventTemplate) -> Result<Vec<EventDescriptor>, TimeError> {
        Ok(self
            .occurrences()?
            .into_iter()
            .map(|start| template.at(start))
            .collect())
    }
}
