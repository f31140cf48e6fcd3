//! Raw event type as returned by the Google Calendar API.
//!
//! This module defines [`RawEvent`], a loosely-typed mirror of a single item
//! from the Calendar v3 `events.list` response. Fields are kept as the API
//! sends them (timestamps stay strings) so that parsing problems surface in
//! [`normalize`](crate::normalize) instead of being silently dropped while
//! deserializing.

use serde::{Deserialize, Serialize};

/// Placeholder title for events without a summary.
pub const NO_TITLE: &str = "(No title)";

/// The start (or end) time of an event.
///
/// Google sends exactly one of `dateTime` (timed events) or `date`
/// (all-day events).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTime {
    /// RFC 3339 timestamp with offset, e.g. `2025-03-14T09:00:00+01:00`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// Calendar date for all-day events, e.g. `2025-03-14`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// IANA timezone the event was created in. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl RawEventTime {
    /// Creates a timed start from an RFC 3339 string.
    pub fn date_time(value: impl Into<String>) -> Self {
        Self {
            date_time: Some(value.into()),
            ..Self::default()
        }
    }

    /// Creates an all-day start from a `YYYY-MM-DD` string.
    pub fn date(value: impl Into<String>) -> Self {
        Self {
            date: Some(value.into()),
            ..Self::default()
        }
    }

    /// Returns true if this is an all-day time.
    pub fn is_all_day(&self) -> bool {
        self.date_time.is_none() && self.date.is_some()
    }
}

/// An attendee of a calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttendee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Whether this entry represents the authenticated user.
    #[serde(default, rename = "self")]
    pub is_self: bool,
    /// `accepted`, `declined`, `tentative` or `needsAction`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

impl RawAttendee {
    /// Creates the attendee entry for the current user.
    pub fn me(response_status: impl Into<String>) -> Self {
        Self {
            email: None,
            is_self: true,
            response_status: Some(response_status.into()),
        }
    }

    /// Creates an attendee entry for somebody else.
    pub fn other(email: impl Into<String>, response_status: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            is_self: false,
            response_status: Some(response_status.into()),
        }
    }

    /// Returns true if the attendee accepted the invitation.
    pub fn has_accepted(&self) -> bool {
        self.response_status.as_deref() == Some("accepted")
    }
}

/// Conference data attached to an event (Google Meet and add-ons).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConferenceData {
    #[serde(default)]
    pub entry_points: Vec<RawEntryPoint>,
}

/// A way to join a conference: video link, phone number, SIP address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntryPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_point_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl RawEntryPoint {
    /// Creates a video entry point with the given URI.
    pub fn video(uri: impl Into<String>) -> Self {
        Self {
            entry_point_type: Some("video".to_string()),
            uri: Some(uri.into()),
        }
    }

    /// Creates a phone entry point with the given `tel:` URI.
    pub fn phone(uri: impl Into<String>) -> Self {
        Self {
            entry_point_type: Some("phone".to_string()),
            uri: Some(uri.into()),
        }
    }
}

/// A raw calendar event.
///
/// Only the fields the menu needs are mapped; everything else in the API
/// payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub start: RawEventTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference_data: Option<RawConferenceData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<RawAttendee>,
}

impl RawEvent {
    /// Creates an event with the given title and start.
    pub fn new(summary: impl Into<String>, start: RawEventTime) -> Self {
        Self {
            summary: Some(summary.into()),
            start,
            ..Self::default()
        }
    }

    /// Returns the title, falling back to [`NO_TITLE`] when missing or blank.
    pub fn effective_title(&self) -> &str {
        self.summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(NO_TITLE)
    }

    /// Returns a short identifier for log messages.
    pub fn log_id(&self) -> &str {
        self.id.as_deref().unwrap_or_else(|| self.effective_title())
    }

    /// Iterates over the URIs of all conference entry points.
    pub fn entry_point_uris(&self) -> impl Iterator<Item = &str> {
        self.conference_data
            .iter()
            .flat_map(|cd| cd.entry_points.iter())
            .filter_map(|ep| ep.uri.as_deref())
    }

    /// Iterates over the attendee entries flagged as the current user.
    pub fn self_attendees(&self) -> impl Iterator<Item = &RawAttendee> {
        self.attendees.iter().filter(|a| a.is_self)
    }

    /// Builder method to set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to add a conference entry point.
    pub fn with_entry_point(mut self, entry_point: RawEntryPoint) -> Self {
        self.conference_data
            .get_or_insert_with(RawConferenceData::default)
            .entry_points
            .push(entry_point);
        self
    }

    /// Builder method to add an attendee.
    pub fn with_attendee(mut self, attendee: RawAttendee) -> Self {
        self.attendees.push(attendee);
        self
    }
}
