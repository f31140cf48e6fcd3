//! Google Calendar provider.
//!
//! Implements [`CalendarProvider`] on top of the token store, the OAuth
//! client and the Calendar API client.

use tracing::{debug, info};
use xbar_gcal_core::RawEvent;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{BoxFuture, CalendarProvider, FetchOptions};

use super::client::GoogleCalendarClient;
use super::config::GoogleConfig;
use super::oauth::OAuthClient;
use super::tokens::{TokenInfo, TokenStorage};

/// Name reported in errors and logs.
const PROVIDER_NAME: &str = "google";

/// Google Calendar provider.
pub struct GoogleProvider {
    config: GoogleConfig,
    token_storage: TokenStorage,
}

impl GoogleProvider {
    /// Creates a new Google provider with the given configuration.
    ///
    /// Any stored token is loaded; nothing talks to the network yet and
    /// the OAuth client is only read once consent or a refresh needs it.
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate()?;

        let token_storage = TokenStorage::new(&config.token_path);
        token_storage.load()?;

        Ok(Self {
            config,
            token_storage,
        })
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    /// Runs the browser consent flow and stores the resulting token.
    pub async fn authenticate(&self) -> ProviderResult<()> {
        info!("starting Google authentication flow");
        let tokens = self
            .oauth_client()?
            .authorize(&self.config.scopes, self.config.loopback_port)
            .await?;
        self.token_storage.set(tokens)?;
        info!("token stored at {}", self.token_storage.path().display());
        Ok(())
    }

    /// Returns true when the stored token is missing or was granted for
    /// other scopes.
    pub fn needs_reauth(&self) -> bool {
        self.token_storage.needs_reauth(&self.config.scopes)
    }

    /// Returns a usable access token.
    ///
    /// A valid stored token is used as is. An expired one is refreshed and
    /// saved. With no usable token (or a failed refresh) the interactive
    /// flow runs.
    pub async fn access_token(&self) -> ProviderResult<String> {
        if self.needs_reauth() {
            debug!("no token with the required scopes");
            self.authenticate().await?;
        }

        let tokens = self.stored_tokens()?;
        if !tokens.is_expired() {
            return Ok(tokens.access_token);
        }

        if tokens.refresh_token.is_some() {
            debug!("refreshing expired access token");
            match self.refresh(tokens).await {
                Ok(refreshed) => {
                    let access_token = refreshed.access_token.clone();
                    self.token_storage.set(refreshed)?;
                    return Ok(access_token);
                }
                Err(e) => info!("token refresh failed, re-authorizing: {}", e),
            }
        }

        self.authenticate().await?;
        Ok(self.stored_tokens()?.access_token)
    }

    fn oauth_client(&self) -> ProviderResult<OAuthClient> {
        OAuthClient::new(self.config.credentials.load()?, self.config.timeout)
    }

    async fn refresh(&self, tokens: TokenInfo) -> ProviderResult<TokenInfo> {
        self.oauth_client()?.refresh(tokens).await
    }

    fn stored_tokens(&self) -> ProviderResult<TokenInfo> {
        self.token_storage
            .get()
            .ok_or_else(|| ProviderError::internal("token missing after authorization"))
    }

    async fn fetch_events_impl(&self, options: FetchOptions) -> ProviderResult<Vec<RawEvent>> {
        let access_token = self.access_token().await?;
        let client = GoogleCalendarClient::new(access_token, self.config.timeout)?;
        client.list_events(&options).await
    }
}

impl CalendarProvider for GoogleProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_events(&self, options: FetchOptions) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
        Box::pin(async move {
            self.fetch_events_impl(options)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }

    fn is_authenticated(&self) -> bool {
        self.token_storage.has_valid_tokens() && !self.needs_reauth()
    }
}
