//! The default command: fetch events and print the menu.

use std::fmt;
use std::io::Write;

use chrono::{DateTime, TimeZone};
use tracing::{debug, warn};
use xbar_gcal_core::{MenuRenderer, write_lines};
use xbar_gcal_providers::{CalendarProvider, FetchOptions};

use crate::error::ClientResult;

/// Prefix of the line printed when the calendar cannot be listed.
pub const API_ERROR_PREFIX: &str = "An error occurred:";

/// Fetches events and writes the menu to `out`, relative to `now`.
///
/// A failed listing is reported as a single menu line so the applet shows
/// it, and counts as success. Malformed event data is an error.
pub async fn run_at<Tz, W>(
    provider: &dyn CalendarProvider,
    options: FetchOptions,
    now: &DateTime<Tz>,
    mut out: W,
) -> ClientResult<()>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    W: Write,
{
    debug!(
        "listing {} events of {} from {}",
        options.max_results, options.calendar_id, options.time_window.start
    );

    let events = match provider.fetch_events(options).await {
        Ok(events) => events,
        Err(e) => {
            warn!("listing failed: {}", e);
            writeln!(out, "{} {}", API_ERROR_PREFIX, e)?;
            out.flush()?;
            return Ok(());
        }
    };

    let lines = MenuRenderer::default().render_at(&events, now)?;
    write_lines(&lines, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use chrono::{FixedOffset, Utc};
    use xbar_gcal_core::{RawAttendee, RawEvent, RawEventTime};
    use xbar_gcal_providers::{BoxFuture, ProviderError, ProviderErrorCode, ProviderResult};

    /// Answers every listing with the same events or the same error.
    struct FixedProvider {
        name: &'static str,
        outcome: Result<Vec<RawEvent>, (ProviderErrorCode, String)>,
    }

    impl FixedProvider {
        fn with_events(name: &'static str, events: Vec<RawEvent>) -> Self {
            Self {
                name,
                outcome: Ok(events),
            }
        }

        fn failing(name: &'static str, error: ProviderError) -> Self {
            Self {
                name,
                outcome: Err((error.code(), error.message().to_string())),
            }
        }
    }

    impl CalendarProvider for FixedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn fetch_events(
            &self,
            options: FetchOptions,
        ) -> BoxFuture<'_, ProviderResult<Vec<RawEvent>>> {
            let result = match &self.outcome {
                Ok(events) => Ok(events
                    .iter()
                    .take(options.max_results as usize)
                    .cloned()
                    .collect()),
                Err((code, message)) => {
                    Err(ProviderError::new(*code, message.clone()).with_provider(self.name))
                }
            };
            Box::pin(async move { result })
        }

        fn is_authenticated(&self) -> bool {
            self.outcome.is_ok()
        }
    }

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 14, 8, 30, 0)
            .unwrap()
    }

    fn options() -> FetchOptions {
        FetchOptions::new(now().with_timezone(&Utc))
    }

    async fn output(provider: &dyn CalendarProvider) -> ClientResult<String> {
        let mut out = Vec::new();
        run_at(provider, options(), &now(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn prints_menu() {
        let provider = FixedProvider::with_events(
            "fixed",
            vec![
                RawEvent::new("Holiday", RawEventTime::date("2025-03-14")),
                RawEvent::new("Standup", RawEventTime::date_time("2025-03-14T09:00:00+01:00"))
                    .with_attendee(RawAttendee::me("accepted")),
            ],
        );

        assert_eq!(
            output(&provider).await.unwrap(),
            "09:00 Standup\n---\n09:00 Standup\nToday Holiday\nRefresh | refresh=true\n"
        );
    }

    #[tokio::test]
    async fn empty_calendar() {
        let provider = FixedProvider::with_events("fixed", vec![]);
        assert_eq!(output(&provider).await.unwrap(), "No upcoming events found.\n");
    }

    #[tokio::test]
    async fn listing_failure_is_shown_and_succeeds() {
        let provider =
            FixedProvider::failing("google", ProviderError::server("API error (503): backend"));

        assert_eq!(
            output(&provider).await.unwrap(),
            "An error occurred: [google] server_error: API error (503): backend\n"
        );
    }

    #[tokio::test]
    async fn listing_is_limited_to_max_results() {
        let provider = FixedProvider::with_events(
            "fixed",
            vec![
                RawEvent::new("Holiday", RawEventTime::date("2025-03-14")),
                RawEvent::new("Offsite", RawEventTime::date("2025-03-15")),
            ],
        );

        let mut out = Vec::new();
        run_at(&provider, options().with_max_results(1), &now(), &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Today Holiday\n---\nToday Holiday\nRefresh | refresh=true\n"
        );
    }

    #[tokio::test]
    async fn malformed_event_is_an_error() {
        let provider = FixedProvider::with_events(
            "fixed",
            vec![RawEvent::new("Broken", RawEventTime::default())],
        );

        assert!(matches!(
            output(&provider).await,
            Err(ClientError::Render(_))
        ));
    }
}
