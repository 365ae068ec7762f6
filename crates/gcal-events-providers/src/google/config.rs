//! Google client identity and endpoint configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

/// Default location of the client secret downloaded from Google Cloud Console.
pub const DEFAULT_CREDENTIALS_PATH: &str = ".credentials/client_secret.json";

/// Default location of the cached token.
pub const DEFAULT_TOKEN_PATH: &str = ".credentials/google-calendar-events.json";

/// Full read/write access to the user's calendars.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Google OAuth endpoints.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Base URL for Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// OAuth 2.0 client identity for an installed application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// The OAuth 2.0 client ID from Google Cloud Console.
    pub client_id: String,
    /// The OAuth 2.0 client secret from Google Cloud Console.
    pub client_secret: String,
    /// Where Google sends the user after consent (first registered URI).
    pub redirect_uri: String,
}

/// Structure of Google's OAuth credentials JSON file.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    /// Credentials for installed (desktop) applications.
    installed: Option<InstalledCredentials>,
    /// Credentials for web applications.
    web: Option<InstalledCredentials>,
}

/// The `installed` (or `web`) section of the credentials file.
#[derive(Debug, Deserialize)]
struct InstalledCredentials {
    client_id: String,
    client_secret: String,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

impl ClientCredentials {
    /// Creates new client credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Loads credentials from a Google Cloud Console JSON file.
    ///
    /// A missing or unreadable file is an I/O error; anything that is not a
    /// complete credential bundle is a parse error.
    pub fn load(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::io(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        debug!("loaded client credentials from {:?}", path);
        Self::from_json(&content)
    }

    /// Parses credentials from a Google credentials JSON string.
    ///
    /// Expects `{"installed": {"client_id", "client_secret", "redirect_uris"}}`;
    /// a `web` section is accepted when `installed` is absent.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let file: CredentialsFile = serde_json::from_str(json).map_err(|e| {
            ProviderError::parse(format!("failed to parse credentials JSON: {}", e)).with_source(e)
        })?;

        let section = file.installed.or(file.web).ok_or_else(|| {
            ProviderError::parse("credentials file must contain an 'installed' section")
        })?;

        let redirect_uri = section.redirect_uris.into_iter().next().ok_or_else(|| {
            ProviderError::parse("credentials file has no entries in 'redirect_uris'")
        })?;

        Ok(Self::new(section.client_id, section.client_secret, redirect_uri))
    }
}

/// Configuration for talking to Google.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Client identity.
    pub credentials: ClientCredentials,

    /// Path of the token cache file.
    pub token_path: PathBuf,

    /// OAuth scopes to request.
    pub scopes: Vec<String>,

    /// Authorization endpoint shown to the operator.
    pub auth_url: String,

    /// Token endpoint for code exchange and refresh.
    pub token_url: String,

    /// Calendar API base URL.
    pub api_base_url: String,

    /// Request timeout for HTTP calls.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration with Google's production endpoints.
    pub fn new(credentials: ClientCredentials) -> Self {
        Self {
            credentials,
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            scopes: vec![CALENDAR_SCOPE.to_string()],
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            api_base_url: CALENDAR_API_BASE.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("gcal-events/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the token cache path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the authorization endpoint.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    /// Sets the token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Sets the Calendar API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the HTTP client shared by the OAuth and Calendar clients.
    pub fn http_client(&self) -> ProviderResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.credentials.client_id.is_empty() {
            return Err(ProviderError::configuration("client_id is required"));
        }
        if self.credentials.client_secret.is_empty() {
            return Err(ProviderError::configuration("client_secret is required"));
        }
        if self.scopes.is_empty() {
            return Err(ProviderError::configuration(
                "at least one OAuth scope is required",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    fn test_credentials() -> ClientCredentials {
        ClientCredentials::new("abc", "xyz", "urn:ietf:wg:oauth:2.0:oob")
    }

    #[test]
    fn credentials_from_json_installed() {
        let json = r#"{
            "installed": {
                "client_id": "abc",
                "client_secret": "xyz",
                "project_id": "my-project",
                "redirect_uris": ["urn:ietf:wg:oauth:2.0:oob", "http://localhost"]
            }
        }"#;

        let creds = ClientCredentials::from_json(json).unwrap();
        assert_eq!(creds, test_credentials());
    }

    #[test]
    fn credentials_from_json_web_fallback() {
        let json = r#"{
            "web": {
                "client_id": "web-id",
                "client_secret": "web-secret",
                "redirect_uris": ["http://localhost:8080/callback"]
            }
        }"#;

        let creds = ClientCredentials::from_json(json).unwrap();
        assert_eq!(creds.client_id, "web-id");
        assert_eq!(creds.redirect_uri, "http://localhost:8080/callback");
    }

    #[test]
    fn credentials_without_redirect_uris_fail() {
        let json = r#"{"installed": {"client_id": "abc", "client_secret": "xyz"}}"#;
        let err = ClientCredentials::from_json(json).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Parse);
        assert!(err.message().contains("redirect_uris"));
    }

    #[test]
    fn credentials_missing_field_fail() {
        let json = r#"{"installed": {"client_id": "abc", "redirect_uris": ["x"]}}"#;
        let err = ClientCredentials::from_json(json).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Parse);
    }

    #[test]
    fn credentials_without_section_fail() {
        let err = ClientCredentials::from_json(r#"{ "other": {} }"#).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Parse);
        assert!(err.message().contains("installed"));
    }

    #[test]
    fn credentials_malformed_json_fail() {
        let err = ClientCredentials::from_json("not json").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Parse);
        assert!(err.message().contains("parse"));
    }

    #[test]
    fn credentials_load_from_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("client_secret.json");
        std::fs::write(
            &path,
            r#"{"installed":{"client_id":"abc","client_secret":"xyz","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#,
        )
        .unwrap();

        assert_eq!(ClientCredentials::load(&path).unwrap(), test_credentials());
    }

    #[test]
    fn credentials_load_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ClientCredentials::load(tmp.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Io);
    }

    #[test]
    fn config_defaults() {
        let config = GoogleConfig::new(test_credentials());
        assert_eq!(config.scopes, vec![CALENDAR_SCOPE.to_string()]);
        assert_eq!(config.token_path, PathBuf::from(DEFAULT_TOKEN_PATH));
        assert_eq!(config.token_url, GOOGLE_TOKEN_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_validation() {
        let bad = GoogleConfig::new(test_credentials()).with_scopes(vec![]);
        assert!(bad.validate().is_err());

        let no_secret = GoogleConfig::new(ClientCredentials::new("abc", "", "urn"));
        assert!(no_secret.validate().is_err());
    }

    #[test]
    fn config_builder_methods() {
        let config = GoogleConfig::new(test_credentials())
            .with_token_path("/tmp/token.json")
            .with_auth_url("http://localhost/auth")
            .with_token_url("http://localhost/token")
            .with_api_base_url("http://localhost/api")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.token_path, PathBuf::from("/tmp/token.json"));
        assert_eq!(config.auth_url, "http://localhost/auth");
        assert_eq!(config.token_url, "http://localhost/token");
        assert_eq!(config.api_base_url, "http://localhost/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
