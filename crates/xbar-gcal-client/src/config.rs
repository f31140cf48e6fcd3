//! Client configuration.
//!
//! Settings live in a single `config.toml`, by default at
//! `<config_dir>/xbar-google-calendar/config.toml`. A missing file means
//! defaults everywhere, which match what the plugin has always done: the
//! primary calendar, ten events, starting three hours ago.
//!
//! ```toml
//! [google]
//! credentials_file = "~/.config/xbar-google-calendar/credentials.json"
//! token_path = "~/.cache/xbar-google-calendar/token.json"
//! calendar_id = "primary"
//! timeout_secs = 30
//!
//! [fetch]
//! max_results = 10
//! lookback_hours = 3
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xbar_gcal_core::{APP, TimeWindow};
use xbar_gcal_providers::google::GoogleConfig;
use xbar_gcal_providers::{
    DEFAULT_LOOKBACK_HOURS, DEFAULT_MAX_RESULTS, FetchOptions, PRIMARY_CALENDAR,
};

use crate::error::{ClientError, ClientResult};

/// Longest accepted lookback: one leap year.
pub const MAX_LOOKBACK_HOURS: u32 = 24 * 366;

/// Configuration for the xbar-google-calendar command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Google account and API settings.
    pub google: GoogleSettings,

    /// What to ask the calendar for.
    pub fetch: FetchSettings,
}

/// Google Calendar settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleSettings {
    /// OAuth client file downloaded from the Cloud Console.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<PathBuf>,

    /// Where the OAuth token is cached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,

    /// Calendar to list.
    pub calendar_id: String,

    /// HTTP timeout in seconds.
    pub timeout_secs: u64,

    /// Loopback port for the consent redirect; 0 picks a free one.
    pub loopback_port: u16,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            credentials_file: None,
            token_path: None,
            calendar_id: PRIMARY_CALENDAR.to_string(),
            timeout_secs: GoogleConfig::DEFAULT_TIMEOUT_SECS,
            loopback_port: 0,
        }
    }
}

impl GoogleSettings {
    /// Returns the credentials file, defaulting to the config directory.
    pub fn credentials_file(&self) -> PathBuf {
        self.credentials_file
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(GoogleConfig::default_credentials_path)
    }

    /// Returns the token path, defaulting to the cache directory.
    pub fn token_path(&self) -> PathBuf {
        self.token_path
            .as_deref()
            .map(expand_tilde)
            .unwrap_or_else(GoogleConfig::default_token_path)
    }

    /// Builds the provider configuration.
    ///
    /// The credentials file is only referenced; the provider reads it when
    /// it has to talk to the OAuth endpoints.
    pub fn to_provider_config(&self) -> GoogleConfig {
        GoogleConfig::new(self.credentials_file())
            .with_token_path(self.token_path())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_loopback_port(self.loopback_port)
    }
}

/// Listing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    /// Maximum number of events to request.
    pub max_results: u32,

    /// How far back the window starts, so running events still show.
    pub lookback_hours: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

impl ClientConfig {
    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// used, and a missing file there yields the defaults.
    pub fn load(path: Option<&Path>) -> ClientResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path();
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!("no config file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| ClientError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parses a TOML document.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP.name)
            .join("config.toml")
    }

    /// Checks the values that TOML alone cannot constrain.
    pub fn validate(&self) -> ClientResult<()> {
        if self.fetch.max_results == 0 {
            return Err(ClientError::Config(
                "fetch.max_results must be at least 1".to_string(),
            ));
        }
        if self.google.timeout_secs == 0 {
            return Err(ClientError::Config(
                "google.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.google.calendar_id.trim().is_empty() {
            return Err(ClientError::Config(
                "google.calendar_id must not be empty".to_string(),
            ));
        }
        if self.fetch.lookback_hours > MAX_LOOKBACK_HOURS {
            return Err(ClientError::Config(format!(
                "fetch.lookback_hours must be at most {}",
                MAX_LOOKBACK_HOURS
            )));
        }
        Ok(())
    }

    /// Builds the listing request relative to `now`.
    pub fn fetch_options(&self, now: DateTime<Utc>) -> FetchOptions {
        FetchOptions::new(now)
            .with_calendar_id(&self.google.calendar_id)
            .with_time_window(TimeWindow::lookback(now, self.fetch.lookback_hours))
            .with_max_results(self.fetch.max_results)
    }

    /// Serializes the configuration back to TOML.
    pub fn to_toml(&self) -> ClientResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::parse("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.google.calendar_id, "primary");
        assert_eq!(config.google.timeout_secs, 30);
        assert_eq!(config.fetch.max_results, 10);
        assert_eq!(config.fetch.lookback_hours, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn full_file() {
        let config = ClientConfig::parse(
            r#"
[google]
credentials_file = "/etc/gcal/credentials.json"
token_path = "/var/cache/gcal/token.json"
calendar_id = "team@group.calendar.google.com"
timeout_secs = 5
loopback_port = 8085

[fetch]
max_results = 25
lookback_hours = 1
"#,
        )
        .unwrap();

        assert_eq!(
            config.google.credentials_file(),
            PathBuf::from("/etc/gcal/credentials.json")
        );
        assert_eq!(
            config.google.token_path(),
            PathBuf::from("/var/cache/gcal/token.json")
        );
        assert_eq!(config.google.loopback_port, 8085);
        assert_eq!(config.fetch.max_results, 25);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ClientConfig::parse("[fetch]\nmax_result = 3\n").unwrap_err();
        assert!(err.contains("max_result"));
    }

    #[test]
    fn validation() {
        let mut config = ClientConfig::default();
        config.fetch.max_results = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.google.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.google.calendar_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn lookback_is_capped() {
        let mut config = ClientConfig::default();
        config.fetch.lookback_hours = MAX_LOOKBACK_HOURS;
        assert!(config.validate().is_ok());

        config.fetch.lookback_hours = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lookback_hours"));
    }

    #[test]
    fn default_paths_use_app_name() {
        let settings = GoogleSettings::default();
        assert!(
            settings
                .credentials_file()
                .ends_with("xbar-google-calendar/credentials.json")
        );
        assert!(settings.token_path().ends_with("xbar-google-calendar/token.json"));
        assert!(ClientConfig::default_path().ends_with("xbar-google-calendar/config.toml"));
    }

    #[test]
    fn tilde_is_expanded() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_tilde(Path::new("~/x/token.json")), home.join("x/token.json"));
        assert_eq!(expand_tilde(Path::new("/abs/~/x")), PathBuf::from("/abs/~/x"));
    }

    #[test]
    fn fetch_options_follow_config() {
        let mut config = ClientConfig::default();
        config.google.calendar_id = "work".into();
        config.fetch.max_results = 3;
        config.fetch.lookback_hours = 0;

        let now = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        let options = config.fetch_options(now);
        assert_eq!(options.calendar_id, "work");
        assert_eq!(options.max_results, 3);
        assert_eq!(options.time_window.start, now);
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fetch]\nmax_results = 4\n").unwrap();

        let config = ClientConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.fetch.max_results, 4);
        assert_eq!(config.fetch.lookback_hours, 3);
    }

    #[test]
    fn provider_config_points_at_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let creds = dir.path().join("credentials.json");
        std::fs::write(
            &creds,
            r#"{"installed": {"client_id": "x.apps.googleusercontent.com", "client_secret": "s"}}"#,
        )
        .unwrap();

        let settings = GoogleSettings {
            credentials_file: Some(creds),
            token_path: Some(dir.path().join("token.json")),
            timeout_secs: 7,
            ..GoogleSettings::default()
        };
        let config = settings.to_provider_config();
        assert_eq!(
            config.credentials.load().unwrap().client_id,
            "x.apps.googleusercontent.com"
        );
        assert_eq!(config.token_path, dir.path().join("token.json"));
        assert_eq!(config.timeout, Duration::from_secs(7));
    }

    #[test]
    fn provider_config_without_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = GoogleSettings {
            credentials_file: Some(dir.path().join("missing.json")),
            ..GoogleSettings::default()
        };
        let config = settings.to_provider_config();
        assert!(config.validate().is_ok());
        assert!(config.credentials.load().is_err());
    }

    #[test]
    fn dump_round_trips() {
        let mut config = ClientConfig::default();
        config.fetch.max_results = 7;
        let text = config.to_toml().unwrap();
        assert_eq!(ClientConfig::parse(&text).unwrap(), config);
    }
}
