//! Menu output for status-bar applets.
//!
//! xbar, SwiftBar and Argos read a plugin's standard output line by line:
//! - lines before `---` are shown in the bar itself
//! - lines after it make up the dropdown
//! - ` | key=value` suffixes attach actions (`href`, `refresh`)
//!
//! # Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use xbar_gcal_core::format::MenuRenderer;
//! use xbar_gcal_core::raw_event::{RawEvent, RawEventTime};
//!
//! let now = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 3, 14, 8, 0, 0).unwrap();
//! let events = vec![RawEvent::new("Holiday", RawEventTime::date("2025-03-14"))];
//!
//! let lines = MenuRenderer::default().render_at(&events, &now).unwrap();
//! assert_eq!(lines, ["Today Holiday", "---", "Today Holiday", "Refresh | refresh=true"]);
//! ```

#[cfg(test)]
mod golden_tests;

use std::fmt;
use std::io::{self, Write};

use chrono::{DateTime, Local, TimeZone};

use crate::error::CoreResult;
use crate::event::{NormalizedEvent, sort_events};
use crate::normalize::Normalizer;
use crate::raw_event::RawEvent;

/// Printed instead of a menu when the calendar has nothing coming up.
pub const NO_EVENTS_MESSAGE: &str = "No upcoming events found.";

/// Separates the bar line from the dropdown.
pub const SEPARATOR: &str = "---";

/// Last dropdown entry: asks the applet to re-run the plugin.
pub const REFRESH_LINE: &str = "Refresh | refresh=true";

/// Renders raw events into applet menu lines.
#[derive(Debug, Default)]
pub struct MenuRenderer {
    normalizer: Normalizer,
}

impl MenuRenderer {
    /// Creates a renderer around a custom normalizer.
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Renders the menu relative to `now`, whose zone is the local zone.
    ///
    /// Output is the headline, the separator, every event in rank order
    /// (headline included) and the refresh line. With no events the output
    /// is the single [`NO_EVENTS_MESSAGE`] line.
    pub fn render_at<Tz: TimeZone>(
        &self,
        events: &[RawEvent],
        now: &DateTime<Tz>,
    ) -> CoreResult<Vec<String>>
    where
        Tz::Offset: fmt::Display,
    {
        if events.is_empty() {
            return Ok(vec![NO_EVENTS_MESSAGE.to_string()]);
        }

        let mut normalized = events
            .iter()
            .map(|event| self.normalizer.normalize_at(event, now))
            .collect::<CoreResult<Vec<NormalizedEvent>>>()?;
        sort_events(&mut normalized);

        let mut lines = Vec::with_capacity(normalized.len() + 3);
        if let Some(headline) = normalized.first() {
            lines.push(headline.display_text.clone());
        }
        lines.push(SEPARATOR.to_string());
        lines.extend(normalized.into_iter().map(|e| e.display_text));
        lines.push(REFRESH_LINE.to_string());

        Ok(lines)
    }

    /// Renders the menu in the host's local timezone.
    pub fn render(&self, events: &[RawEvent], now: DateTime<Local>) -> CoreResult<Vec<String>> {
        self.render_at(events, &now)
    }
}

/// Renders events with the default link extractors.
pub fn render(events: &[RawEvent], now: DateTime<Local>) -> CoreResult<Vec<String>> {
    MenuRenderer::default().render(events, now)
}

/// Writes lines to `out`, one per line.
pub fn write_lines<W: Write>(lines: &[String], mut out: W) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}
