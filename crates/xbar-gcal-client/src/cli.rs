//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ClientConfig, MAX_LOOKBACK_HOURS};

/// xbar-google-calendar - upcoming Google Calendar events for xbar,
/// SwiftBar and Argos
#[derive(Debug, Parser)]
#[command(name = "xbar-google-calendar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "XBAR_GCAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output on stderr (ignored under Argos)
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Maximum number of events to fetch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_results: Option<u32>,

    /// Calendar to list
    #[arg(long)]
    pub calendar_id: Option<String>,

    /// Hours before now at which the listing starts
    #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_LOOKBACK_HOURS)))]
    pub lookback_hours: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(max) = self.max_results {
            config.fetch.max_results = max;
        }
        if let Some(ref id) = self.calendar_id {
            config.google.calendar_id = id.clone();
        }
        if let Some(hours) = self.lookback_hours {
            config.fetch.lookback_hours = hours;
        }
    }
}

/// Available commands. Without one, events are fetched and printed.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authorize access to Google Calendar
    Auth {
        /// Run the consent flow even if a usable token exists
        #[arg(long, short)]
        force: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
