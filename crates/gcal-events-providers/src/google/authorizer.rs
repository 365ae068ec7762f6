//! Obtaining an authorized session.
//!
//! The [`Authorizer`] is a small state machine:
//!
//! ```text
//! Start ──cache hit──▶ Cached ──────────────────────────▶ Authorized
//!   │                    │ expired, has refresh token
//!   │                    └──▶ refresh ──▶ write cache ──▶ Authorized
//!   │
//!   └──cache miss──▶ NeedsInteractiveGrant
//!                      print URL, read one line, exchange code
//!                      └──▶ write cache ──▶ Authorized
//! ```
//!
//! Any failure aborts the attempt; nothing is retried. The prompt and the
//! code exchange sit behind [`CodePrompt`] and [`TokenExchanger`] so the
//! flow can run without a terminal or a network.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::BoxFuture;
use crate::error::{ProviderError, ProviderResult};

use super::config::{ClientCredentials, GoogleConfig};
use super::oauth::{OAuthClient, build_auth_url};
use super::tokens::{Token, TokenCache};

/// Turns a one-time code or a refresh token into a [`Token`].
pub trait TokenExchanger: Send + Sync {
    /// Exchanges an authorization code.
    fn exchange<'a>(&'a self, code: &'a str) -> BoxFuture<'a, ProviderResult<Token>>;

    /// Exchanges a refresh token for a new access token.
    fn refresh<'a>(&'a self, refresh_token: &'a str) -> BoxFuture<'a, ProviderResult<Token>>;
}

/// Shows the authorization URL and waits for the operator's code.
pub trait CodePrompt: Send + Sync {
    /// Returns the code the operator typed. Blocks until a line arrives.
    fn prompt_code<'a>(&'a self, auth_url: &'a str) -> BoxFuture<'a, ProviderResult<String>>;
}

/// Prompts on stdout and reads the code from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl CodePrompt for StdinPrompt {
    fn prompt_code<'a>(&'a self, auth_url: &'a str) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(async move {
            println!("Authorize this app by visiting this url: {}", auth_url);
            print!("Enter the code from that page here: ");
            std::io::stdout()
                .flush()
                .map_err(|e| ProviderError::io(format!("failed to write prompt: {}", e)))?;

            let mut line = String::new();
            let read = BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await
                .map_err(|e| ProviderError::io(format!("failed to read code: {}", e)))?;

            if read == 0 {
                return Err(ProviderError::authentication(
                    "input closed before an authorization code was entered",
                ));
            }

            Ok(line)
        })
    }
}

/// How the session's token was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOrigin {
    /// Read from the token cache as-is.
    Cached,
    /// Read from the cache, then refreshed and written back.
    Refreshed,
    /// Granted interactively and written to the cache.
    Granted,
}

/// Client identity bound to a usable token.
#[derive(Debug, Clone)]
pub struct AuthorizedSession {
    credentials: ClientCredentials,
    token: Token,
    origin: TokenOrigin,
}

impl AuthorizedSession {
    /// Creates a session.
    pub fn new(credentials: ClientCredentials, token: Token, origin: TokenOrigin) -> Self {
        Self {
            credentials,
            token,
            origin,
        }
    }

    /// The bearer token used to sign requests.
    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    /// The full token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// The client identity.
    pub fn credentials(&self) -> &ClientCredentials {
        &self.credentials
    }

    /// Where the token came from.
    pub fn origin(&self) -> TokenOrigin {
        self.origin
    }
}

/// States of one authorization attempt.
enum AuthState {
    Start,
    Cached(Token),
    NeedsInteractiveGrant,
    Authorized(AuthorizedSession),
}

impl AuthState {
    // Never log the payload: it carries the token.
    fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Cached(_) => "cached",
            Self::NeedsInteractiveGrant => "needs_interactive_grant",
            Self::Authorized(_) => "authorized",
        }
    }
}

/// Produces an [`AuthorizedSession`], prompting only when the cache is empty.
pub struct Authorizer<E, P> {
    credentials: ClientCredentials,
    scopes: Vec<String>,
    auth_url: String,
    cache: TokenCache,
    exchanger: E,
    prompt: P,
}

impl Authorizer<OAuthClient, StdinPrompt> {
    /// Creates an authorizer that talks to Google and prompts on the terminal.
    pub fn interactive(config: &GoogleConfig) -> ProviderResult<Self> {
        config.validate()?;
        let exchanger = OAuthClient::new(config)?;
        Ok(Self::new(config, exchanger, StdinPrompt))
    }
}

impl<E, P> Authorizer<E, P>
where
    E: TokenExchanger,
    P: CodePrompt,
{
    /// Creates an authorizer with explicit collaborators.
    pub fn new(config: &GoogleConfig, exchanger: E, prompt: P) -> Self {
        Self {
            credentials: config.credentials.clone(),
            scopes: config.scopes.clone(),
            auth_url: config.auth_url.clone(),
            cache: TokenCache::new(&config.token_path),
            exchanger,
            prompt,
        }
    }

    /// The token cache used by this authorizer.
    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// The URL the operator visits to grant access.
    pub fn authorization_url(&self) -> String {
        build_auth_url(&self.auth_url, &self.credentials, &self.scopes)
    }

    /// Runs the state machine to completion.
    pub async fn authorize(&self) -> ProviderResult<AuthorizedSession> {
        let mut state = AuthState::Start;

        loop {
            debug!("authorization state: {}", state.name());
            state = match state {
                AuthState::Start => match self.cache.read()? {
                    Some(token) => AuthState::Cached(token),
                    None => AuthState::NeedsInteractiveGrant,
                },
                AuthState::Cached(token) => self.resume(token).await?,
                AuthState::NeedsInteractiveGrant => {
                    AuthState::Authorized(self.grant_interactively().await?)
                }
                AuthState::Authorized(session) => return Ok(session),
            };
        }
    }

    async fn resume(&self, token: Token) -> ProviderResult<AuthState> {
        if !token.is_expired() {
            info!("using cached token from {:?}", self.cache.path());
            return Ok(AuthState::Authorized(self.session(token, TokenOrigin::Cached)));
        }

        let Some(refresh_token) = token.refresh_token.as_deref() else {
            warn!("cached token expired and has no refresh token");
            return Ok(AuthState::NeedsInteractiveGrant);
        };

        debug!("refreshing expired access token");
        let fresh = self.exchanger.refresh(refresh_token).await?;
        self.cache.write(&fresh)?;
        Ok(AuthState::Authorized(
            self.session(fresh, TokenOrigin::Refreshed),
        ))
    }

    async fn grant_interactively(&self) -> ProviderResult<AuthorizedSession> {
        let url = self.authorization_url();
        let code = self.prompt.prompt_code(&url).await?;
        let code = code.trim();
        if code.is_empty() {
            return Err(ProviderError::authentication(
                "no authorization code was entered",
            ));
        }

        info!("received authorization code, exchanging for tokens...");
        let token = self.exchanger.exchange(code).await?;
        self.cache.write(&token)?;
        Ok(self.session(token, TokenOrigin::Granted))
    }

    fn session(&self, token: Token, origin: TokenOrigin) -> AuthorizedSession {
        AuthorizedSession::new(self.credentials.clone(), token, origin)
    }
}
