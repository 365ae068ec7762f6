//! Google OAuth2 authorization and Calendar API access.
//!
//! This crate takes an installed-application client secret to an
//! authorized Calendar client:
//!
//! ```text
//! ┌────────────────────┐
//! │ client_secret.json │  ClientCredentials::load
//! └─────────┬──────────┘
//!           ▼
//! ┌────────────────────┐    ┌──────────────┐
//! │     Authorizer     │◀──▶│  TokenCache  │
//! └─────────┬──────────┘    └──────────────┘
//!           │ AuthorizedSession
//!           ▼
//! ┌────────────────────┐
//! │GoogleCalendarClient│  events.list / events.insert
//! └────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gcal_events_providers::google::{Authorizer, ClientCredentials, GoogleCalendarClient,
//!     GoogleConfig, ListEventsQuery};
//!
//! let config = GoogleConfig::new(ClientCredentials::load(".credentials/client_secret.json")?);
//! let session = Authorizer::interactive(&config)?.authorize().await?;
//! let client = GoogleCalendarClient::new(&session, &config)?;
//! let events = client.list_events(&ListEventsQuery::upcoming(10)).await?;
//! ```

use std::future::Future;
use std::pin::Pin;

pub mod error;
pub mod google;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};

/// A boxed future that is `Send`.
///
/// Keeps the authorizer's collaborator traits object-safe without
/// `async fn` in traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
