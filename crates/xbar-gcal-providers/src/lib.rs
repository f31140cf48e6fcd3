//! Calendar backends for xbar-google-calendar.
//!
//! - [`CalendarProvider`] - the trait the binary fetches events through
//! - [`FetchOptions`] - which calendar, window and limit to ask for
//! - [`ProviderError`] - everything that can go wrong on the way
//! - [`google`] - the Google Calendar implementation (feature `google`)
//!
//! Providers hand back [`xbar_gcal_core::RawEvent`]s untouched; ranking and
//! formatting happen in `xbar-gcal-core`.

pub mod error;
#[cfg(feature = "google")]
pub mod google;
pub mod provider;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use provider::{
    BoxFuture, CalendarProvider, DEFAULT_LOOKBACK_HOURS, DEFAULT_MAX_RESULTS, FetchOptions,
    PRIMARY_CALENDAR,
};
