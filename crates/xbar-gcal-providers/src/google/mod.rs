//! Google Calendar provider.
//!
//! [`GoogleProvider`] lists events with the Calendar API v3. Authorization
//! uses the user's own OAuth desktop client (`credentials.json` from the
//! Cloud Console) and the PKCE loopback flow; the resulting token is kept
//! in the user's cache directory and refreshed when it expires.
//!
//! # Example
//!
//! ```ignore
//! use xbar_gcal_providers::google::{GoogleConfig, GoogleProvider};
//! use xbar_gcal_providers::{CalendarProvider, FetchOptions};
//!
//! let config = GoogleConfig::new(GoogleConfig::default_credentials_path());
//! let provider = GoogleProvider::new(config)?;
//! let events = provider.fetch_events(FetchOptions::new(chrono::Utc::now())).await?;
//! ```

mod client;
mod config;
mod oauth;
mod provider;
mod tokens;

pub use client::GoogleCalendarClient;
pub use config::{CredentialsSource, GoogleConfig, OAuthCredentials};
pub use oauth::{Callback, OAuthClient, PkceFlow};
pub use provider::GoogleProvider;
pub use tokens::{TokenInfo, TokenStorage};
