//! CalendarProvider trait definition.
//!
//! A provider turns a [`FetchOptions`] into the list of [`RawEvent`]s the
//! menu is rendered from. The Google backend lives in [`crate::google`].

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use xbar_gcal_core::{RawEvent, TimeWindow};

use crate::error::ProviderResult;

/// Calendar listed when no other is configured.
pub const PRIMARY_CALENDAR: &str = "primary";

/// Default number of events requested.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Default lookback so that events already in progress still show up.
pub const DEFAULT_LOOKBACK_HOURS: u32 = 3;

/// Options for fetching events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Calendar to list.
    pub calendar_id: String,
    /// Time window to fetch events for.
    pub time_window: TimeWindow,
    /// Maximum number of events to return.
    pub max_results: u32,
}

impl FetchOptions {
    /// Creates the default query relative to `now`: the primary calendar,
    /// starting three hours back, ten events.
    ///
    /// Recurring events are always expanded and ordered by start time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            calendar_id: PRIMARY_CALENDAR.to_string(),
            time_window: TimeWindow::lookback(now, DEFAULT_LOOKBACK_HOURS),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Builder method to set the calendar.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Builder method to set time window.
    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = window;
        self
    }

    /// Builder method to set max results.
    pub fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so callers can hold a
/// `Box<dyn CalendarProvider>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The abstraction over calendar backends.
pub trait CalendarProvider: Send + Sync {
    /// Returns the name of this provider (e.g. "google").
    fn name(&self) -> &str;

    /// Fetches events for one calendar.
    ///
    /// The returned order is whatever the backend produced; callers re-sort.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, authentication failures,
    /// or an undecodable response.
    fn fetch_events(&self, options: FetchOptions) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>>;

    /// Returns true if the provider holds credentials it can use without
    /// asking the user.
    fn is_authenticated(&self) -> bool;
}
