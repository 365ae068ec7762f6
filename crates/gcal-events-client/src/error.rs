//! Client error types.

use std::fmt;

use gcal_events_core::TimeError;
use gcal_events_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Provider error.
    Provider(ProviderError),
    /// IO error.
    Io(std::io::Error),
    /// Authentication required.
    AuthRequired(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Provider(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::AuthRequired(msg) => write!(f, "authentication required: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<TimeError> for ClientError {
    fn from(err: TimeError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes() {
        let err = ClientError::Config("bad start".to_string());
        assert_eq!(err.to_string(), "configuration error: bad start");

        let err = ClientError::AuthRequired("run `gcal-events auth`".to_string());
        assert_eq!(
            err.to_string(),
            "authentication required: run `gcal-events auth`"
        );
    }

    #[test]
    fn provider_error_passes_through() {
        let err: ClientError = ProviderError::network("connection failed").into();
        assert_eq!(err.to_string(), "network_error: connection failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn time_error_is_config() {
        let err: ClientError = gcal_events_core::parse_timestamp("tomorrow")
            .unwrap_err()
            .into();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
