//! OAuth 2.0 authorization-code flow for installed applications.
//!
//! The operator opens the authorization URL, grants access, and copies the
//! one-time code Google shows back into the terminal. The code is then
//! exchanged at the token endpoint for an access token and a refresh token.

use serde::Deserialize;
use tracing::{debug, info};

use crate::BoxFuture;
use crate::error::{ProviderError, ProviderResult};

use super::authorizer::TokenExchanger;
use super::config::{ClientCredentials, GoogleConfig};
use super::tokens::Token;

/// Builds the URL the operator visits to grant access.
///
/// Requests offline access so the token endpoint also returns a refresh
/// token.
pub fn build_auth_url(auth_url: &str, credentials: &ClientCredentials, scopes: &[String]) -> String {
    let scope = scopes.join(" ");

    format!(
        "{}?access_type=offline&scope={}&response_type=code&client_id={}&redirect_uri={}",
        auth_url,
        urlencoding::encode(&scope),
        urlencoding::encode(&credentials.client_id),
        urlencoding::encode(&credentials.redirect_uri),
    )
}

/// OAuth client talking to Google's token endpoint.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    credentials: ClientCredentials,
    token_url: String,
    http_client: reqwest::Client,
}

impl OAuthClient {
    /// Creates a new OAuth client from the configuration.
    pub fn new(config: &GoogleConfig) -> ProviderResult<Self> {
        Ok(Self {
            credentials: config.credentials.clone(),
            token_url: config.token_url.clone(),
            http_client: config.http_client()?,
        })
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> ProviderResult<Token> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.credentials.redirect_uri.as_str()),
        ];

        let token = self.request_token(&params, "token exchange").await?;
        info!("successfully obtained tokens");
        Ok(token)
    }

    /// Obtains a fresh access token using a refresh token.
    ///
    /// Google usually omits the refresh token from a refresh response; the
    /// returned token then carries the one that was used.
    pub async fn refresh_token(&self, refresh_token: &str) -> ProviderResult<Token> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        let mut token = self.request_token(&params, "token refresh").await?;
        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }

        info!("successfully refreshed access token");
        Ok(token)
    }

    async fn request_token(&self, params: &[(&str, &str)], what: &str) -> ProviderResult<Token> {
        debug!("POST {} ({})", self.token_url, what);

        let response = self
            .http_client
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| {
                ProviderError::network(format!("{} request failed: {}", what, e)).with_source(e)
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| e.to_string())
                .unwrap_or(body);
            return Err(ProviderError::authentication(format!(
                "{} failed ({}): {}",
                what, status, detail
            )));
        }

        let token_response: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("invalid token response: {}", e))
        })?;

        Ok(token_response.into_token())
    }
}

impl TokenExchanger for OAuthClient {
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, ProviderResult<Token>> {
        Box::pin(self.exchange_code(code))
    }

    fn refresh<'a>(&'a self, refresh_token: &'a str) -> BoxFuture<'a, ProviderResult<Token>> {
        Box::pin(self.refresh_token(refresh_token))
    }
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> Token {
        let mut token = Token::new(self.access_token);
        token.refresh_token = self.refresh_token;
        token.scope = self.scope.unwrap_or_default();
        token.token_type = self.token_type;
        match self.expires_in {
            Some(secs) => token.expiring_in(secs),
            None => token,
        }
    }
}

/// Error body from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl std::fmt::Display for TokenErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{} ({})", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}
