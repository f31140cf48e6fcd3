//! Tracing setup for xbar-google-calendar
//!
//! Standard output belongs to the status-bar applet, so every log line is
//! written to standard error. Under Argos, which shows stderr in the menu,
//! logging is switched off entirely.
//!
//! # Usage
//!
//! ```ignore
//! use xbar_gcal_core::tracing::{init_tracing, HostApplet, TracingConfig};
//!
//! init_tracing(TracingConfig::for_host(HostApplet::detect(), false))
//!     .expect("failed to initialize tracing");
//! ```

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// The program running us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostApplet {
    /// Argos (GNOME Shell). Sets `ARGOS_VERSION`.
    Argos,
    /// SwiftBar (macOS). Sets `SWIFTBAR`.
    SwiftBar,
    /// xbar or BitBar (macOS). Sets `XBARDarkMode` or `BitBar`.
    Xbar,
    /// Run by hand from a shell.
    Terminal,
}

impl HostApplet {
    /// Detects the host from the process environment.
    pub fn detect() -> Self {
        Self::from_env(|key| std::env::var_os(key).is_some())
    }

    /// Detects the host using `is_set` to test environment variables.
    pub fn from_env(is_set: impl Fn(&str) -> bool) -> Self {
        if is_set("ARGOS_VERSION") {
            Self::Argos
        } else if is_set("SWIFTBAR") {
            Self::SwiftBar
        } else if is_set("XBARDarkMode") || is_set("BitBar") {
            Self::Xbar
        } else {
            Self::Terminal
        }
    }

    /// Returns true if the host shows stderr to the user.
    pub fn shows_stderr(self) -> bool {
        matches!(self, Self::Argos)
    }
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The default log level when RUST_LOG is not set
    pub default_level: LevelFilter,
    /// Whether to include file/line information in logs
    pub include_location: bool,
    /// Whether to include target (module path) in logs
    pub include_target: bool,
    /// Ignore RUST_LOG
    pub ignore_env: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LevelFilter::WARN,
            include_location: false,
            include_target: false,
            ignore_env: false,
        }
    }
}

impl TracingConfig {
    /// Create a config suitable for debugging from a terminal
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: LevelFilter::DEBUG,
            include_location: true,
            include_target: true,
            ..Self::default()
        }
    }

    /// Create a config that emits nothing
    #[must_use]
    pub fn silent() -> Self {
        Self {
            default_level: LevelFilter::OFF,
            ignore_env: true,
            ..Self::default()
        }
    }

    /// Picks the config for a host applet.
    ///
    /// Hosts that display stderr get [`silent`](Self::silent) no matter
    /// what; elsewhere `debug` selects [`cli_debug`](Self::cli_debug).
    #[must_use]
    pub fn for_host(host: HostApplet, debug: bool) -> Self {
        if host.shows_stderr() {
            Self::silent()
        } else if debug {
            Self::cli_debug()
        } else {
            Self::default()
        }
    }

    fn build_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.default_level.to_string());
        if self.ignore_env {
            return fallback();
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    }
}

/// Initialize tracing with the given configuration.
///
/// This should be called once at the start of the application.
/// The `RUST_LOG` environment variable can be used to override the default
/// level unless the config ignores it.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let subscriber = tracing_subscriber::registry()
        .with(config.build_filter())
        .with(
            fmt::layer()
                .compact()
                .without_time()
                .with_writer(std::io::stderr)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_target(config.include_target),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
