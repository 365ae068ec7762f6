//! Google Calendar API client.
//!
//! Thin wrapper over the two endpoints this tool needs: `events.list` and
//! `events.insert`. Every request is signed with the session's access token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gcal_events_core::{EventDescriptor, Reminder};

use crate::error::{ProviderError, ProviderResult};

use super::authorizer::AuthorizedSession;
use super::config::GoogleConfig;

/// Calendar addressed when none is configured.
pub const PRIMARY_CALENDAR: &str = "primary";

/// Parameters for `events.list`.
#[derive(Debug, Clone)]
pub struct ListEventsQuery {
    /// Calendar identifier.
    pub calendar_id: String,
    /// Lower bound (exclusive) for an event's end time.
    pub time_min: DateTime<Utc>,
    /// Maximum number of events to return.
    pub max_results: u32,
    /// Whether to expand recurring events into instances.
    pub single_events: bool,
}

impl ListEventsQuery {
    /// Upcoming events on the primary calendar, starting now.
    pub fn upcoming(max_results: u32) -> Self {
        Self {
            calendar_id: PRIMARY_CALENDAR.to_string(),
            time_min: Utc::now(),
            max_results,
            single_events: true,
        }
    }

    /// Sets the calendar.
    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Sets the lower time bound.
    pub fn with_time_min(mut self, time_min: DateTime<Utc>) -> Self {
        self.time_min = time_min;
        self
    }
}

/// Google Calendar API client.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    api_base_url: String,
    access_token: String,
}

impl GoogleCalendarClient {
    /// Creates a client signing requests with the session's token.
    pub fn new(session: &AuthorizedSession, config: &GoogleConfig) -> ProviderResult<Self> {
        Ok(Self {
            http_client: config.http_client()?,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            access_token: session.access_token().to_string(),
        })
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base_url,
            urlencoding::encode(calendar_id)
        )
    }

    /// Lists events ordered by start time.
    pub async fn list_events(&self, query: &ListEventsQuery) -> ProviderResult<Vec<ApiEvent>> {
        let url = self.events_url(&query.calendar_id);
        debug!("GET {}", url);

        let mut request = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", query.time_min.to_rfc3339()),
                ("maxResults", query.max_results.to_string()),
                ("singleEvents", query.single_events.to_string()),
            ]);

        // orderBy=startTime is only accepted together with singleEvents
        if query.single_events {
            request = request.query(&[("orderBy", "startTime")]);
        }

        let response = request.send().await.map_err(request_error)?;
        let body = check_response(response).await?;

        let list: EventListResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
        })?;

        debug!(
            "fetched {} events from calendar {}",
            list.items.len(),
            query.calendar_id
        );
        Ok(list.items)
    }

    /// Inserts one event and returns the created resource.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventDescriptor,
    ) -> ProviderResult<ApiEvent> {
        let url = self.events_url(calendar_id);
        debug!("POST {} ({})", url, event.start_timestamp());

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&NewEvent::from(event))
            .send()
            .await
            .map_err(request_error)?;
        let body = check_response(response).await?;

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse created event: {}", e))
        })
    }
}

fn request_error(e: reqwest::Error) -> ProviderError {
    let message = if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    };
    ProviderError::network(message).with_source(e)
}

/// Maps the HTTP status onto a provider error, returning the body on success.
async fn check_response(response: reqwest::Response) -> ProviderResult<String> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        return Err(ProviderError::rate_limited(format!(
            "rate limit exceeded{}",
            retry_after
                .map(|s| format!(", retry after {} seconds", s))
                .unwrap_or_default()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

    if status.is_success() {
        return Ok(body);
    }

    let detail = serde_json::from_str::<ApiErrorResponse>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    Err(match status {
        reqwest::StatusCode::UNAUTHORIZED => {
            ProviderError::authentication(format!("access token expired or invalid: {}", detail))
        }
        reqwest::StatusCode::FORBIDDEN => {
            ProviderError::authorization(format!("access denied to calendar: {}", detail))
        }
        reqwest::StatusCode::NOT_FOUND => {
            ProviderError::not_found(format!("calendar not found: {}", detail))
        }
        reqwest::StatusCode::BAD_REQUEST => ProviderError::bad_request(detail),
        _ => ProviderError::server(format!("API error ({}): {}", status, detail)),
    })
}

/// An event as returned by the Calendar API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: ApiEventTime,
    #[serde(default)]
    pub end: ApiEventTime,
    #[serde(default)]
    pub html_link: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiEvent {
    /// The start as shown to the user: `dateTime`, or `date` for all-day
    /// events.
    pub fn start_display(&self) -> &str {
        self.start.display()
    }

    /// The summary, empty when the event has none.
    pub fn summary_display(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }
}

/// Start or end of an API event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ApiEventTime {
    fn display(&self) -> &str {
        self.date_time
            .as_deref()
            .or(self.date.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct EventListResponse {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Request body for `events.insert`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewEvent<'a> {
    summary: &'a str,
    start: NewEventTime<'a>,
    end: NewEventTime<'a>,
    reminders: NewReminders<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewEventTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewReminders<'a> {
    use_default: bool,
    overrides: &'a [Reminder],
}

impl<'a> From<&'a EventDescriptor> for NewEvent<'a> {
    fn from(event: &'a EventDescriptor) -> Self {
        Self {
            summary: &event.summary,
            start: NewEventTime {
                date_time: event.start_timestamp(),
                time_zone: &event.time_zone,
            },
            end: NewEventTime {
                date_time: event.end_timestamp(),
                time_zone: &event.time_zone,
            },
            reminders: NewReminders {
                use_default: false,
                overrides: &event.reminders,
            },
        }
    }
}
