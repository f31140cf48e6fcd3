//! Google Calendar provider configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use xbar_gcal_core::APP;

use crate::error::{ProviderError, ProviderResult};

/// OAuth 2.0 client credentials from the Google Cloud Console.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    /// The OAuth 2.0 client ID.
    pub client_id: String,
    /// The OAuth 2.0 client secret.
    pub client_secret: String,
}

/// Structure of Google's OAuth credentials JSON file.
///
/// Supports two layouts:
/// 1. Cloud Console download with an "installed" or "web" section
/// 2. Flat `client_id`/`client_secret` at the root (e.g. from gcloud)
#[derive(Debug, Deserialize)]
struct GoogleCredentialsFile {
    installed: Option<NestedCredentials>,
    web: Option<NestedCredentials>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NestedCredentials {
    client_id: String,
    client_secret: String,
}

impl OAuthCredentials {
    /// Creates new OAuth credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Loads OAuth credentials from a `credentials.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to read credentials file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses OAuth credentials from a Google credentials JSON string.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let file: GoogleCredentialsFile = serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration(format!("failed to parse credentials JSON: {}", e))
        })?;

        if let Some(creds) = file.installed.or(file.web) {
            return Ok(Self::new(creds.client_id, creds.client_secret));
        }

        match (file.client_id, file.client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(Self::new(client_id, client_secret)),
            _ => Err(ProviderError::configuration(
                "credentials file must contain an 'installed'/'web' section or 'client_id'/'client_secret' at root level",
            )),
        }
    }

    /// Checks that the credentials look like a Google desktop client.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.client_id.is_empty() {
            return Err("client_id is required");
        }
        if !self.client_id.ends_with(".apps.googleusercontent.com") {
            return Err("client_id should end with .apps.googleusercontent.com");
        }
        if self.client_secret.is_empty() {
            return Err("client_secret is required");
        }
        Ok(())
    }
}

/// Where the OAuth client comes from.
///
/// A file is only read when the consent flow or a token refresh needs it,
/// so a run with a valid stored token never touches it.
#[derive(Debug, Clone)]
pub enum CredentialsSource {
    /// A `credentials.json` downloaded from the Cloud Console.
    File(PathBuf),
    /// Credentials already in memory.
    Inline(OAuthCredentials),
}

impl CredentialsSource {
    /// Returns validated credentials, reading the file if needed.
    pub fn load(&self) -> ProviderResult<OAuthCredentials> {
        let credentials = match self {
            Self::File(path) => OAuthCredentials::from_file(path)?,
            Self::Inline(credentials) => credentials.clone(),
        };
        credentials.validate().map_err(|e| {
            ProviderError::configuration(format!("invalid credentials: {}", e))
        })?;
        Ok(credentials)
    }
}

impl From<OAuthCredentials> for CredentialsSource {
    fn from(credentials: OAuthCredentials) -> Self {
        Self::Inline(credentials)
    }
}

impl From<PathBuf> for CredentialsSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

/// Configuration for the Google Calendar provider.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth client used for consent and refresh.
    pub credentials: CredentialsSource,

    /// Where the OAuth token is persisted.
    ///
    /// Defaults to `<cache_dir>/xbar-google-calendar/token.json`.
    pub token_path: PathBuf,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Port for the loopback OAuth redirect; 0 lets the OS choose.
    pub loopback_port: u16,

    /// OAuth scopes to request.
    pub scopes: Vec<String>,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a new Google configuration with the given credentials.
    pub fn new(credentials: impl Into<CredentialsSource>) -> Self {
        Self {
            credentials: credentials.into(),
            token_path: Self::default_token_path(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            loopback_port: 0,
            scopes: APP.scope_list(),
        }
    }

    /// Returns `<cache_dir>/xbar-google-calendar/token.json`.
    pub fn default_token_path() -> PathBuf {
        app_dir(dirs::cache_dir()).join("token.json")
    }

    /// Returns `<config_dir>/xbar-google-calendar/credentials.json`.
    pub fn default_credentials_path() -> PathBuf {
        app_dir(dirs::config_dir()).join("credentials.json")
    }

    /// Sets the token storage path.
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the loopback port for OAuth.
    pub fn with_loopback_port(mut self, port: u16) -> Self {
        self.loopback_port = port;
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Validates the configuration.
    ///
    /// Inline credentials are checked here; a credentials file is checked
    /// when it is loaded.
    pub fn validate(&self) -> ProviderResult<()> {
        if let CredentialsSource::Inline(ref credentials) = self.credentials {
            credentials.validate().map_err(|e| {
                ProviderError::configuration(format!("invalid credentials: {}", e))
            })?;
        }

        if self.scopes.is_empty() {
            return Err(ProviderError::configuration(
                "at least one OAuth scope is required",
            ));
        }

        if self.timeout.is_zero() {
            return Err(ProviderError::configuration("timeout must be positive"));
        }

        Ok(())
    }
}

fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP.name)
}
