//! OAuth token and its on-disk cache.
//!
//! The cache holds at most one token at a fixed path. Writing always
//! replaces the whole file; there is no merge with what was there before.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};

/// Tokens this close to expiry are treated as expired.
const EXPIRY_LEEWAY_SECS: i64 = 60;

/// An OAuth access token with its refresh token and expiry.
///
/// Field names match the token files written by Google's client libraries,
/// so an existing cache keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The access token for API requests.
    pub access_token: String,

    /// The refresh token for obtaining new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token expires (milliseconds since the epoch on disk).
    #[serde(
        rename = "expiry_date",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub expiry: Option<DateTime<Utc>>,

    /// Space-separated scopes that were granted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,

    /// Usually `Bearer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl Token {
    /// Creates a token with no refresh token, expiry or scope.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expiry: None,
            scope: String::new(),
            token_type: None,
        }
    }

    /// Sets the refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the expiry, truncated to whole milliseconds as stored on disk.
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = DateTime::from_timestamp_millis(expiry.timestamp_millis());
        self
    }

    /// Sets the expiry relative to now.
    pub fn expiring_in(self, secs: i64) -> Self {
        self.with_expiry(Utc::now() + Duration::seconds(secs))
    }

    /// Sets the granted scope.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Sets the token type.
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Returns true if the access token is expired or about to expire.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the access token is unusable at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= expiry,
            // No expiry recorded: assume it is still valid
            None => false,
        }
    }
}

/// File-backed cache for a single [`Token`].
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    /// Creates a cache at the given path. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the token file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached token.
    ///
    /// Returns `Ok(None)` when no token has been cached yet. A file that
    /// exists but cannot be read or parsed is an error.
    pub fn read(&self) -> ProviderResult<Option<Token>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no token file at {:?}", self.path);
                return Ok(None);
            }
            Err(e) => {
                return Err(ProviderError::io(format!(
                    "failed to read token file {}: {}",
                    self.path.display(),
                    e
                ))
                .with_source(e));
            }
        };

        let token: Token = serde_json::from_str(&content).map_err(|e| {
            ProviderError::parse(format!(
                "failed to parse token file {}: {}",
                self.path.display(),
                e
            ))
            .with_source(e)
        })?;

        debug!("loaded token from {:?}", self.path);
        Ok(Some(token))
    }

    /// Writes `token`, replacing any cached token.
    pub fn write(&self, token: &Token) -> ProviderResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ProviderError::io(format!(
                    "failed to create token directory {}: {}",
                    parent.display(),
                    e
                ))
                .with_source(e)
            })?;
        }

        let content = serde_json::to_string(token).map_err(|e| {
            ProviderError::internal(format!("failed to serialize token: {}", e)).with_source(e)
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("json.tmp");
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&temp_path).map_err(|e| {
            ProviderError::io(format!("failed to create token file: {}", e)).with_source(e)
        })?;

        // mode() only applies on creation; a leftover temp file keeps its own
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
                warn!("failed to restrict permissions on {:?}: {}", temp_path, e);
            }
        }

        file.write_all(content.as_bytes()).map_err(|e| {
            ProviderError::io(format!("failed to write token file: {}", e)).with_source(e)
        })?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|e| {
            ProviderError::io(format!("failed to rename token file: {}", e)).with_source(e)
        })?;

        info!("token stored to {:?}", self.path);
        Ok(())
    }

    /// Removes the cached token, if any.
    pub fn clear(&self) -> ProviderResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("cleared token at {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ProviderError::io(format!(
                "failed to remove token file {}: {}",
                self.path.display(),
                e
            ))
            .with_source(e)),
        }
    }
}
