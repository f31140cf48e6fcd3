//! The `xbar-google-calendar` command.
//!
//! Fetches upcoming events from Google Calendar and prints them in the
//! plugin format understood by xbar, SwiftBar and Argos.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
