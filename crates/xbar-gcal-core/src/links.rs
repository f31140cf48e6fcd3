//! Meeting link extraction.
//!
//! A meeting link can come from several places on an event. Each place is
//! handled by one [`UrlExtractor`]; a [`LinkResolver`] asks them in order and
//! keeps the first URL found.
//!
//! # Example
//!
//! ```
//! use xbar_gcal_core::links::LinkResolver;
//! use xbar_gcal_core::raw_event::{RawEntryPoint, RawEvent, RawEventTime};
//!
//! let event = RawEvent::new("Standup", RawEventTime::date("2025-03-14"))
//!     .with_entry_point(RawEntryPoint::video("https://meet.google.com/abc-defg-hij"));
//!
//! let resolver = LinkResolver::default();
//! assert_eq!(
//!     resolver.resolve(&event).as_deref(),
//!     Some("https://meet.google.com/abc-defg-hij")
//! );
//! ```

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::raw_event::RawEvent;

/// Prefix of Google Meet join URLs.
pub const GOOGLE_MEET_PREFIX: &str = "https://meet.google.com";

/// Regex for BlueJeans Primetime live event URLs.
static BLUEJEANS_LIVE_EVENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://primetime\.bluejeans\.com/a2m/live-event/\w{8,}")
        .expect("Invalid BlueJeans regex")
});

/// A strategy that finds at most one meeting URL on an event.
pub trait UrlExtractor: fmt::Debug + Send + Sync {
    /// A short name for log messages.
    fn name(&self) -> &'static str;

    /// Returns the meeting URL this strategy finds on `event`, if any.
    fn extract(&self, event: &RawEvent) -> Option<String>;
}

/// Finds a conference entry point whose URI starts with a given prefix.
///
/// Yields a URL only when exactly one entry point matches; an event with
/// several candidate rooms is ambiguous and gets no link from this source.
#[derive(Debug, Clone)]
pub struct EntryPointExtractor {
    prefix: String,
}

impl EntryPointExtractor {
    /// Creates an extractor matching URIs that start with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Creates an extractor for Google Meet links.
    pub fn google_meet() -> Self {
        Self::new(GOOGLE_MEET_PREFIX)
    }
}

impl UrlExtractor for EntryPointExtractor {
    fn name(&self) -> &'static str {
        "entry-point"
    }

    fn extract(&self, event: &RawEvent) -> Option<String> {
        let mut matches = event
            .entry_point_uris()
            .filter(|uri| uri.starts_with(&self.prefix));

        match (matches.next(), matches.next()) {
            (Some(uri), None) => Some(uri.to_string()),
            _ => None,
        }
    }
}

/// Scans the event description with a regex and keeps the first match.
#[derive(Debug, Clone)]
pub struct DescriptionExtractor {
    pattern: &'static LazyLock<Regex>,
}

impl DescriptionExtractor {
    /// Creates an extractor for BlueJeans live event links.
    pub fn bluejeans_live_event() -> Self {
        Self {
            pattern: &BLUEJEANS_LIVE_EVENT_REGEX,
        }
    }
}

impl UrlExtractor for DescriptionExtractor {
    fn name(&self) -> &'static str {
        "description"
    }

    fn extract(&self, event: &RawEvent) -> Option<String> {
        let description = event.description.as_deref()?;
        self.pattern
            .find(description)
            .map(|m| m.as_str().to_string())
    }
}

/// An ordered list of extractors, combined first-match-wins.
#[derive(Debug)]
pub struct LinkResolver {
    extractors: Vec<Box<dyn UrlExtractor>>,
}

impl LinkResolver {
    /// Creates a resolver with no extractors.
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Appends an extractor; earlier extractors take precedence.
    pub fn with_extractor(mut self, extractor: impl UrlExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Returns the first URL any extractor finds.
    pub fn resolve(&self, event: &RawEvent) -> Option<String> {
        self.extractors.iter().find_map(|extractor| {
            let url = extractor.extract(event)?;
            tracing::trace!(
                extractor = extractor.name(),
                event = event.log_id(),
                url = %url,
                "resolved meeting link"
            );
            Some(url)
        })
    }
}

impl Default for LinkResolver {
    /// Google Meet entry points first, then BlueJeans links in the description.
    fn default() -> Self {
        Self::empty()
            .with_extractor(EntryPointExtractor::google_meet())
            .with_extractor(DescriptionExtractor::bluejeans_live_event())
    }
}
