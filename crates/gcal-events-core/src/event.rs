//! Event descriptors for batch creation.
//!
//! An [`EventTemplate`] holds everything that stays the same between the
//! created events; an [`EventDescriptor`] is one concrete event ready to be
//! sent to a calendar.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::time::format_timestamp;

/// Default summary for created events.
pub const DEFAULT_SUMMARY: &str = "Event Name";

/// Default IANA time zone for created events.
pub const DEFAULT_TIME_ZONE: &str = "America/Chicago";

/// Default popup reminders, in minutes before the start.
pub const DEFAULT_REMINDER_MINUTES: [u32; 2] = [12 * 60, 10];

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderMethod {
    /// A popup notification in the calendar UI.
    #[default]
    Popup,
}

/// A reminder override attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Delivery method.
    pub method: ReminderMethod,
    /// Minutes before the event start.
    pub minutes: u32,
}

impl Reminder {
    /// Creates a popup reminder.
    pub fn popup(minutes: u32) -> Self {
        Self {
            method: ReminderMethod::Popup,
            minutes,
        }
    }
}

/// The fixed part of every created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTemplate {
    /// Event title.
    pub summary: String,
    /// IANA time zone name sent alongside start and end.
    pub time_zone: String,
    /// Reminder overrides; the calendar's default reminders are disabled.
    pub reminders: Vec<Reminder>,
}

impl Default for EventTemplate {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            reminders: DEFAULT_REMINDER_MINUTES
                .iter()
                .copied()
                .map(Reminder::popup)
                .collect(),
        }
    }
}

impl EventTemplate {
    /// Sets the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the time zone.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Replaces the reminders with popups at the given minutes.
    pub fn with_popup_reminders(mut self, minutes: &[u32]) -> Self {
        self.reminders = minutes.iter().copied().map(Reminder::popup).collect();
        self
    }

    /// Instantiates the template at a concrete start time.
    ///
    /// The end equals the start: created events have zero duration.
    pub fn at(&self, start: DateTime<FixedOffset>) -> EventDescriptor {
        EventDescriptor {
            summary: self.summary.clone(),
            start,
            end: start,
            time_zone: self.time_zone.clone(),
            reminders: self.reminders.clone(),
        }
    }
}

/// One event ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub summary: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub time_zone: String,
    pub reminders: Vec<Reminder>,
}

impl EventDescriptor {
    /// The start time in wire format.
    pub fn start_timestamp(&self) -> String {
        format_timestamp(&self.start)
    }

    /// The end time in wire format.
    pub fn end_timestamp(&self) -> String {
        format_timestamp(&self.end)
    }
}
