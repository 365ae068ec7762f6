//! Google Calendar access for an installed application.
//!
//! # Authentication Flow
//!
//! 1. The client ID, secret and redirect URI are read from the JSON file
//!    downloaded from Google Cloud Console
//! 2. A cached token is reused when present; an expired one is refreshed
//! 3. Otherwise the authorization URL is printed and the operator pastes
//!    back the code Google displays
//! 4. The code is exchanged for access and refresh tokens
//! 5. The token is cached for later runs

mod authorizer;
mod client;
mod config;
mod oauth;
mod tokens;

pub use authorizer::{
    AuthorizedSession, Authorizer, CodePrompt, StdinPrompt, TokenExchanger, TokenOrigin,
};
pub use client::{ApiEvent, ApiEventTime, GoogleCalendarClient, ListEventsQuery, PRIMARY_CALENDAR};
pub use config::{
    CALENDAR_API_BASE, CALENDAR_SCOPE, ClientCredentials, DEFAULT_CREDENTIALS_PATH,
    DEFAULT_TOKEN_PATH, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL, GoogleConfig,
};
pub use oauth::{OAuthClient, build_auth_url};
pub use tokens::{Token, TokenCache};
