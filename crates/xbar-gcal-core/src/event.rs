//! Normalized event types.
//!
//! This module provides the types produced by normalization:
//! - [`Bucket`]: the coarse priority tier of an event
//! - [`LabelFormat`]: how the start time is shown
//! - [`SortKey`]: bucket plus distance from now
//! - [`NormalizedEvent`]: a sort key and the menu line for one event
//!
//! [`classify`] is the decision table mapping an event's situation to its
//! bucket and label format.

use std::fmt;

use chrono::{DateTime, TimeDelta, TimeZone};

/// Priority tier of an event. Lower tiers are listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Today and accepted by the current user.
    AcceptedToday = 0,
    /// Today at a specific time.
    TimedToday = 1,
    /// Today, all day, not accepted.
    AllDayToday = 2,
    /// Any other day.
    Later = 3,
}

impl Bucket {
    /// Returns the numeric rank of this bucket.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// How the start of an event is rendered in its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// `HH:MM`
    Time,
    /// `YYYY-MM-DD HH:MM`
    DateTime,
    /// The literal `Today`.
    Today,
    /// `YYYY-MM-DD`
    Date,
}

impl LabelFormat {
    /// Renders the label for a start time in the local zone.
    pub fn render<Tz: TimeZone>(self, start: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self {
            Self::Time => start.format("%H:%M").to_string(),
            Self::DateTime => start.format("%Y-%m-%d %H:%M").to_string(),
            Self::Today => "Today".to_string(),
            Self::Date => start.format("%Y-%m-%d").to_string(),
        }
    }
}

/// The facts about an event that decide where and how it is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// The event starts on the current local date.
    pub is_today: bool,
    /// The event has a start time (it is not all-day).
    pub has_time: bool,
    /// The current user accepted the invitation.
    pub accepted: bool,
}

/// Maps an event's classification to its bucket and label format.
pub fn classify(c: Classification) -> (Bucket, LabelFormat) {
    match (c.is_today, c.has_time, c.accepted) {
        (true, true, true) => (Bucket::AcceptedToday, LabelFormat::Time),
        (true, false, true) => (Bucket::AcceptedToday, LabelFormat::Today),
        (true, true, false) => (Bucket::TimedToday, LabelFormat::Time),
        (true, false, false) => (Bucket::AllDayToday, LabelFormat::Today),
        (false, true, _) => (Bucket::Later, LabelFormat::DateTime),
        (false, false, _) => (Bucket::Later, LabelFormat::Date),
    }
}

/// Sort key of a normalized event: bucket first, then distance from now.
///
/// The distance is absolute, so an event five minutes ago and one five
/// minutes ahead rank the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub bucket: Bucket,
    pub distance: TimeDelta,
}

impl SortKey {
    /// Creates a sort key.
    pub fn new(bucket: Bucket, distance: TimeDelta) -> Self {
        Self { bucket, distance }
    }
}

/// An event ready for the menu: where it sorts and the line to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub sort_key: SortKey,
    pub display_text: String,
}

impl NormalizedEvent {
    /// Creates a normalized event.
    pub fn new(sort_key: SortKey, display_text: impl Into<String>) -> Self {
        Self {
            sort_key,
            display_text: display_text.into(),
        }
    }
}

/// Sorts events in place by sort key. Equal keys keep their input order.
pub fn sort_events(events: &mut [NormalizedEvent]) {
    events.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
}
