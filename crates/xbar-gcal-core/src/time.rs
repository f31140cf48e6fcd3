//! Time types for calendar events.
//!
//! This module provides [`EventStart`] for the parsed start of an event
//! (either a specific instant or an all-day date), and [`TimeWindow`] for
//! the query range sent to the calendar API.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::raw_event::RawEvent;

/// Format of `start.date` for all-day events.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The parsed start of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStart {
    /// A specific instant, with the offset it was sent with.
    Timed(DateTime<FixedOffset>),
    /// An all-day event date.
    AllDay(NaiveDate),
}

impl EventStart {
    /// Parses the start of a raw event.
    ///
    /// A non-empty `dateTime` takes precedence over `date`. A value that
    /// does not parse is an error; there is no fallback between the two
    /// fields.
    pub fn parse(event: &RawEvent) -> CoreResult<Self> {
        if let Some(value) = event.start.date_time.as_ref().filter(|v| !v.is_empty()) {
            return DateTime::parse_from_rfc3339(value)
                .map(Self::Timed)
                .map_err(|source| CoreError::InvalidDateTime {
                    event: event.log_id().to_string(),
                    value: value.clone(),
                    source,
                });
        }

        if let Some(ref value) = event.start.date {
            return NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(Self::AllDay)
                .map_err(|source| CoreError::InvalidDate {
                    event: event.log_id().to_string(),
                    value: value.clone(),
                    source,
                });
        }

        Err(CoreError::MissingStart {
            event: event.log_id().to_string(),
        })
    }

    /// Returns true if the event starts at a specific time.
    pub fn has_time(&self) -> bool {
        matches!(self, Self::Timed(_))
    }

    /// Converts the start to the given timezone.
    ///
    /// All-day dates are taken as midnight in that zone. When midnight does
    /// not exist there (a DST gap), the date is read as UTC midnight.
    pub fn in_zone<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        match self {
            Self::Timed(dt) => dt.with_timezone(tz),
            Self::AllDay(date) => {
                let midnight = date.and_time(NaiveTime::MIN);
                tz.from_local_datetime(&midnight)
                    .earliest()
                    .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
            }
        }
    }
}

/// Absolute distance between two instants.
pub fn distance<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> TimeDelta {
    (a.clone() - b.clone()).abs()
}

/// A time window for querying calendar events.
///
/// The end is optional: the menu asks for "everything from a little while
/// ago onwards" and lets the result limit cut the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive), if bounded.
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Creates an open-ended window starting at `start`.
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    /// Creates an open-ended window starting `hours` before `now`, so that
    /// events already in progress are still listed.
    ///
    /// A lookback reaching past the earliest representable instant starts
    /// the window there.
    pub fn lookback(now: DateTime<Utc>, hours: u32) -> Self {
        let start = now
            .checked_sub_signed(Duration::hours(i64::from(hours)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::starting_at(start)
    }

    /// Builder method to bound the window.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }
}
