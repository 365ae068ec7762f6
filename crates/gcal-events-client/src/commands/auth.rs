//! Authentication commands.

use tracing::info;

use gcal_events_providers::ProviderErrorCode;
use gcal_events_providers::google::{
    AuthorizedSession, Authorizer, CodePrompt, GoogleConfig, TokenExchanger, TokenOrigin,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Runs the authorization flow and reports where the token came from.
///
/// With `force`, the cached token is discarded first so the operator is
/// always prompted.
pub async fn authorize(config: &ClientConfig, force: bool) -> ClientResult<()> {
    let google = config.google_config()?;
    let authorizer = Authorizer::interactive(&google)?;

    if force {
        authorizer.cache().clear()?;
    }

    let session = run(&authorizer).await?;
    match session.origin() {
        TokenOrigin::Cached => {
            println!("Already authorized with Google Calendar.");
            println!("Use --force to re-authorize.");
        }
        TokenOrigin::Refreshed => {
            println!("Access token refreshed.");
        }
        TokenOrigin::Granted => {
            println!("Authorization successful!");
        }
    }

    Ok(())
}

/// Loads credentials and obtains a session, prompting only when needed.
pub async fn session(config: &ClientConfig) -> ClientResult<(GoogleConfig, AuthorizedSession)> {
    let google = config.google_config()?;
    let authorizer = Authorizer::interactive(&google)?;
    let session = run(&authorizer).await?;
    Ok((google, session))
}

async fn run<E, P>(authorizer: &Authorizer<E, P>) -> ClientResult<AuthorizedSession>
where
    E: TokenExchanger,
    P: CodePrompt,
{
    let session = authorizer.authorize().await.map_err(|e| {
        if e.code() == ProviderErrorCode::AuthenticationFailed {
            ClientError::AuthRequired(e.to_string())
        } else {
            ClientError::Provider(e)
        }
    })?;

    if session.origin() != TokenOrigin::Cached {
        println!("Token stored to {}", authorizer.cache().path().display());
    }

    info!("authorized ({:?})", session.origin());
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcal_events_providers::google::{Token, TokenCache};
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write_credentials(dir: &Path) -> ClientConfig {
        let credentials_path = dir.join("client_secret.json");
        std::fs::write(
            &credentials_path,
            r#"{"installed":{"client_id":"abc","client_secret":"xyz","redirect_uris":["urn:ietf:wg:oauth:2.0:oob"]}}"#,
        )
        .unwrap();

        ClientConfig {
            credentials_path,
            token_path: dir.join("token.json"),
            ..ClientConfig::default()
        }
    }

    #[tokio::test]
    async fn session_reuses_cached_token() {
        let tmp = tempfile::tempdir().unwrap();
        let config = write_credentials(tmp.path());
        TokenCache::new(&config.token_path)
            .write(&Token::new("AT1").with_refresh_token("RT1").expiring_in(3600))
            .unwrap();

        let (google, session) = session(&config).await.unwrap();
        assert_eq!(session.access_token(), "AT1");
        assert_eq!(session.origin(), TokenOrigin::Cached);
        assert_eq!(google.credentials.client_id, "abc");
    }

    #[tokio::test]
    async fn session_refreshes_through_token_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "AT2",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mut config = write_credentials(tmp.path());
        config.google.token_url = Some(format!("{}/token", server.uri()));
        TokenCache::new(&config.token_path)
            .write(&Token::new("AT1").with_refresh_token("RT1").expiring_in(-60))
            .unwrap();

        let (_, session) = session(&config).await.unwrap();
        assert_eq!(session.access_token(), "AT2");
        assert_eq!(session.origin(), TokenOrigin::Refreshed);

        let stored = TokenCache::new(&config.token_path).read().unwrap().unwrap();
        assert_eq!(stored.access_token, "AT2");
        assert_eq!(stored.refresh_token.as_deref(), Some("RT1"));
    }

    #[tokio::test]
    async fn rejected_refresh_requires_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let mut config = write_credentials(tmp.path());
        config.google.token_url = Some(format!("{}/token", server.uri()));
        TokenCache::new(&config.token_path)
            .write(&Token::new("AT1").with_refresh_token("RT1").expiring_in(-60))
            .unwrap();

        let err = session(&config).await.unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired(_)));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn missing_credentials_abort_before_authorizing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            credentials_path: tmp.path().join("missing.json"),
            token_path: tmp.path().join("token.json"),
            ..ClientConfig::default()
        };

        let err = session(&config).await.unwrap_err();
        assert!(matches!(err, ClientError::Provider(_)));
        assert!(!config.token_path.exists());
    }
}
