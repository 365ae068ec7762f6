//! Creating a batch of events.

use std::io::Write;

use tracing::{debug, warn};

use gcal_events_core::EventDescriptor;
use gcal_events_providers::google::GoogleCalendarClient;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Command-line overrides for `create`.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub start: Option<String>,
    pub count: Option<usize>,
    pub interval_days: Option<i64>,
    pub dry_run: bool,
}

/// Builds the schedule and inserts every event, or only prints them on a
/// dry run.
pub async fn run(config: &ClientConfig, options: CreateOptions) -> ClientResult<()> {
    let schedule = config.schedule(
        options.start.as_deref(),
        options.count,
        options.interval_days,
    )?;
    let events = schedule.build_events(&config.event_template())?;
    let mut out = std::io::stdout();

    if options.dry_run {
        return print_plan(&events, &mut out);
    }

    let (google, session) = super::auth::session(config).await?;
    let client = GoogleCalendarClient::new(&session, &google)?;
    insert_all(&client, &config.create.calendar_id, &events, &mut out).await?;
    Ok(())
}

/// Prints the events that would be created.
pub fn print_plan<W: Write>(events: &[EventDescriptor], out: &mut W) -> ClientResult<()> {
    for event in events {
        writeln!(
            out,
            "{} - {} ({})",
            event.start_timestamp(),
            event.summary,
            event.time_zone
        )?;
    }
    Ok(())
}

/// Inserts each event in order and returns how many were created.
///
/// Insertions are independent: a failure is reported on `out` and the
/// remaining events are still attempted.
pub async fn insert_all<W: Write>(
    client: &GoogleCalendarClient,
    calendar_id: &str,
    events: &[EventDescriptor],
    out: &mut W,
) -> ClientResult<usize> {
    let mut created = 0;

    for event in events {
        match client.insert_event(calendar_id, event).await {
            Ok(resource) => {
                writeln!(
                    out,
                    "Event created for {}: {}",
                    event.start_timestamp(),
                    resource.html_link.as_deref().unwrap_or_default()
                )?;
                created += 1;
            }
            Err(e) => {
                warn!("inserting event at {} failed: {}", event.start_timestamp(), e);
                writeln!(
                    out,
                    "There was an error contacting the Calendar service: {}",
                    e
                )?;
            }
        }
    }

    debug!("created {} of {} events", created, events.len());
    Ok(created)
}
