//! Client error types.

use thiserror::Error;
use xbar_gcal_core::CoreError;
use xbar_gcal_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that end the program with a non-zero status.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Bad or unreadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider could not be set up or authorized.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// An event could not be turned into a menu line.
    #[error("cannot render events: {0}")]
    Render(#[from] CoreError),

    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
