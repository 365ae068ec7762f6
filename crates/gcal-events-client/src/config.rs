//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/gcal-events/config.toml` by default. Every key is optional; a
//! missing file behaves like an empty one.
//!
//! ```toml
//! credentials_path = ".credentials/client_secret.json"
//! token_path = ".credentials/google-calendar-events.json"
//!
//! [google]
//! timeout = 30
//!
//! [list]
//! calendar_id = "primary"
//! max_results = 10
//!
//! [create]
//! summary = "Event Name"
//! start = "2017-10-05T08:00:00-05:00"
//! count = 6
//! interval_days = 14
//! reminder_minutes = [720, 10]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use gcal_events_core::event::{DEFAULT_REMINDER_MINUTES, DEFAULT_SUMMARY, DEFAULT_TIME_ZONE};
use gcal_events_core::schedule::{
    DEFAULT_EVENT_COUNT, DEFAULT_INTERVAL_DAYS, DEFAULT_START, MAX_EVENT_COUNT,
};
use gcal_events_core::{EventTemplate, RecurringSchedule, parse_timestamp};
use gcal_events_providers::google::{
    ClientCredentials, DEFAULT_CREDENTIALS_PATH, DEFAULT_TOKEN_PATH, GoogleConfig,
    ListEventsQuery, PRIMARY_CALENDAR,
};

use crate::error::{ClientError, ClientResult};

/// Configuration for the gcal-events client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Client secret JSON downloaded from Google Cloud Console.
    pub credentials_path: PathBuf,

    /// Where the OAuth token is cached.
    pub token_path: PathBuf,

    /// Google endpoint settings.
    pub google: GoogleSettings,

    /// Settings for `list`.
    pub list: ListSettings,

    /// Settings for `create`.
    pub create: CreateSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            google: GoogleSettings::default(),
            list: ListSettings::default(),
            create: CreateSettings::default(),
        }
    }
}

/// Google endpoint overrides.
///
/// Unset endpoints use Google's production URLs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    /// Authorization endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    /// Token endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,

    /// Calendar API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout: u64,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            auth_url: None,
            token_url: None,
            api_base_url: None,
            timeout: GoogleConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Settings for listing upcoming events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    /// Calendar to read from.
    pub calendar_id: String,

    /// Maximum number of events to show.
    pub max_results: u32,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            calendar_id: PRIMARY_CALENDAR.to_string(),
            max_results: 10,
        }
    }
}

/// Settings for the batch of created events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSettings {
    /// Calendar to insert into.
    pub calendar_id: String,

    /// Title of every created event.
    pub summary: String,

    /// IANA time zone attached to the start and end.
    pub time_zone: String,

    /// Start of the first event, RFC 3339.
    pub start: String,

    /// Number of events.
    pub count: usize,

    /// Days between consecutive events.
    pub interval_days: i64,

    /// Popup reminders, in minutes before the start.
    pub reminder_minutes: Vec<u32>,
}

impl Default for CreateSettings {
    fn default() -> Self {
        Self {
            calendar_id: PRIMARY_CALENDAR.to_string(),
            summary: DEFAULT_SUMMARY.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            start: DEFAULT_START.to_string(),
            count: DEFAULT_EVENT_COUNT,
            interval_days: DEFAULT_INTERVAL_DAYS,
            reminder_minutes: DEFAULT_REMINDER_MINUTES.to_vec(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("no config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            ClientError::Config(format!("failed to parse config {}: {}", path.display(), e))
        })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gcal-events")
    }

    /// Loads the client secret and builds the provider configuration.
    pub fn google_config(&self) -> ClientResult<GoogleConfig> {
        let credentials = ClientCredentials::load(&self.credentials_path)?;
        Ok(self.google_config_with(credentials))
    }

    /// Builds the provider configuration around already loaded credentials.
    pub fn google_config_with(&self, credentials: ClientCredentials) -> GoogleConfig {
        let mut config = GoogleConfig::new(credentials)
            .with_token_path(&self.token_path)
            .with_timeout(Duration::from_secs(self.google.timeout));

        if let Some(ref url) = self.google.auth_url {
            config = config.with_auth_url(url);
        }
        if let Some(ref url) = self.google.token_url {
            config = config.with_token_url(url);
        }
        if let Some(ref url) = self.google.api_base_url {
            config = config.with_api_base_url(url);
        }

        config
    }

    /// Upcoming-events query, with command-line overrides applied.
    pub fn list_query(&self, max_results: Option<u32>, calendar: Option<String>) -> ListEventsQuery {
        ListEventsQuery::upcoming(max_results.unwrap_or(self.list.max_results))
            .with_calendar(calendar.unwrap_or_else(|| self.list.calendar_id.clone()))
    }

    /// Template shared by every created event.
    pub fn event_template(&self) -> EventTemplate {
        EventTemplate::default()
            .with_summary(&self.create.summary)
            .with_time_zone(&self.create.time_zone)
            .with_popup_reminders(&self.create.reminder_minutes)
    }

    /// Creation schedule, with command-line overrides applied.
    pub fn schedule(
        &self,
        start: Option<&str>,
        count: Option<usize>,
        interval_days: Option<i64>,
    ) -> ClientResult<RecurringSchedule> {
        let count = count.unwrap_or(self.create.count);
        if count > MAX_EVENT_COUNT {
            return Err(ClientError::Config(format!(
                "event count {} exceeds the maximum of {}",
                count, MAX_EVENT_COUNT
            )));
        }

        let start = parse_timestamp(start.unwrap_or(&self.create.start))?;
        let schedule = RecurringSchedule::new(start)
            .with_event_count(count)
            .with_interval_days(interval_days.unwrap_or(self.create.interval_days));

        // Surface an unrepresentable last date as a config error up front
        schedule.occurrences()?;
        Ok(schedule)
    }
}
