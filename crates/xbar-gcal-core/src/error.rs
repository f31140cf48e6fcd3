//! Error types for event normalization.

use thiserror::Error;

/// Errors raised while turning a raw event into a menu line.
///
/// These are never recovered locally: a malformed API response fails the
/// whole run and the next refresh tries again.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The event has neither `start.dateTime` nor `start.date`.
    #[error("event {event} has no start time")]
    MissingStart { event: String },

    /// `start.dateTime` is not a valid RFC 3339 timestamp.
    #[error("event {event}: invalid start dateTime {value:?}")]
    InvalidDateTime {
        event: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// `start.date` is not a valid `YYYY-MM-DD` date.
    #[error("event {event}: invalid start date {value:?}")]
    InvalidDate {
        event: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
