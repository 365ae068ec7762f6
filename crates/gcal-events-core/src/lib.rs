//! Core types: event templates, schedules, timestamps, tracing

pub mod event;
pub mod schedule;
pub mod time;
pub mod tracing;

pub use event::{EventDescriptor, EventTemplate, Reminder, ReminderMethod};
pub use schedule::RecurringSchedule;
pub use time::{TimeError, format_timestamp, parse_timestamp};
pub use tracing::{TracingConfig, TracingError, init_tracing};
