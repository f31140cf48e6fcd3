//! RawEvent to NormalizedEvent conversion.
//!
//! The normalization process:
//! 1. Resolves the meeting link through the [`LinkResolver`]
//! 2. Checks whether the current user accepted the invitation
//! 3. Parses the start and places it relative to the local "today"
//! 4. Looks up bucket and label in the [`classify`] decision table
//! 5. Builds the menu line and sort key

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::error::CoreResult;
use crate::event::{Classification, NormalizedEvent, SortKey, classify};
use crate::links::LinkResolver;
use crate::raw_event::RawEvent;
use crate::time::{EventStart, distance};

/// Returns true if the current user accepted the event.
///
/// Requires exactly one self-attendee entry with status `accepted`. No
/// self entry, or several, count as not accepted.
pub fn is_accepted(event: &RawEvent) -> bool {
    let mut mine = event.self_attendees();
    match (mine.next(), mine.next()) {
        (Some(me), None) => me.has_accepted(),
        _ => false,
    }
}

/// Builds the menu line: `<label> <title>` with an optional
/// ` | href=<url>` action.
pub fn display_text(label: &str, title: &str, url: Option<&str>) -> String {
    let title = single_line(title);
    match url {
        Some(url) => format!("{label} {title} | href={url}"),
        None => format!("{label} {title}"),
    }
}

/// Collapses line breaks so a title never spans several menu lines.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns raw events into menu entries.
#[derive(Debug, Default)]
pub struct Normalizer {
    resolver: LinkResolver,
}

impl Normalizer {
    /// Creates a normalizer with a custom link resolver.
    pub fn new(resolver: LinkResolver) -> Self {
        Self { resolver }
    }

    /// Normalizes one event relative to `now`.
    ///
    /// The zone of `now` is the local zone: "today", the label and the
    /// distance are all computed in it.
    pub fn normalize_at<Tz: TimeZone>(
        &self,
        event: &RawEvent,
        now: &DateTime<Tz>,
    ) -> CoreResult<NormalizedEvent>
    where
        Tz::Offset: fmt::Display,
    {
        let url = self.resolver.resolve(event);
        let accepted = is_accepted(event);

        let start = EventStart::parse(event)?;
        let local_start = start.in_zone(&now.timezone());
        let is_today = local_start.date_naive() == now.date_naive();

        let (bucket, label_format) = classify(Classification {
            is_today,
            has_time: start.has_time(),
            accepted,
        });

        let label = label_format.render(&local_start);
        let sort_key = SortKey::new(bucket, distance(&local_start, now));

        tracing::debug!(
            event = event.log_id(),
            bucket = bucket.rank(),
            accepted,
            is_today,
            "normalized event"
        );

        Ok(NormalizedEvent::new(
            sort_key,
            display_text(&label, event.effective_title(), url.as_deref()),
        ))
    }
}

/// Normalizes one event with the default link resolver.
pub fn normalize_at<Tz: TimeZone>(event: &RawEvent, now: &DateTime<Tz>) -> CoreResult<NormalizedEvent>
where
    Tz::Offset: fmt::Display,
{
    Normalizer::default().normalize_at(event, now)
}

/// Normalizes one event in the host's local timezone.
pub fn normalize(event: &RawEvent, now: DateTime<Local>) -> CoreResult<NormalizedEvent> {
    normalize_at(event, &now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Bucket;
    use crate::raw_event::{RawAttendee, RawEntryPoint, RawEventTime};
    use chrono::{FixedOffset, TimeDelta};

    const MEET: &str = "https://meet.google.com/abc-defg-hij";
    const BLUEJEANS: &str = "https://primetime.bluejeans.com/a2m/live-event/abcd1234";

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(3600).unwrap()
    }

    /// 2025-03-14 08:30 in a UTC+1 zone.
    fn now() -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2025, 3, 14, 8, 30, 0).unwrap()
    }

    fn timed(summary: &str, at: &str) -> RawEvent {
        RawEvent::new(summary, RawEventTime::date_time(at))
    }

    fn all_day(summary: &str, on: &str) -> RawEvent {
        RawEvent::new(summary, RawEventTime::date(on))
    }

    mod labels {
        use super::*;

        #[test]
        fn timed_today_shows_time_only() {
            let event = timed("Standup", "2025-03-14T09:00:00+01:00");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "09:00 Standup");
        }

        #[test]
        fn timed_today_is_converted_to_local_time() {
            let event = timed("Standup", "2025-03-14T08:00:00Z");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "09:00 Standup");
        }

        #[test]
        fn timed_other_day_shows_date_and_time() {
            let event = timed("Review", "2025-03-15T14:30:00+01:00");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "2025-03-15 14:30 Review");
        }

        #[test]
        fn all_day_today_shows_today() {
            let event = all_day("Holiday", "2025-03-14");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "Today Holiday");
        }

        #[test]
        fn all_day_other_day_shows_date() {
            let event = all_day("Offsite", "2025-03-17");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "2025-03-17 Offsite");
        }

        #[test]
        fn today_is_decided_in_local_zone() {
            // 23:30 UTC on the 13th is 00:30 on the 14th in UTC+1.
            let event = timed("Late", "2025-03-13T23:30:00Z");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "00:30 Late");
            assert_eq!(n.sort_key.bucket, Bucket::TimedToday);
        }

        #[test]
        fn title_newlines_are_collapsed() {
            let event = timed("Line one\r\nline two\n", "2025-03-14T09:00:00+01:00");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "09:00 Line one line two");
            assert!(!n.display_text.contains('\n'));
        }

        #[test]
        fn missing_title_uses_placeholder() {
            let mut event = timed("", "2025-03-14T09:00:00+01:00");
            event.summary = None;
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "09:00 (No title)");
        }
    }

    mod links {
        use super::*;

        #[test]
        fn single_meet_link_is_appended() {
            let event = timed("Standup", "2025-03-14T09:00:00+01:00")
                .with_entry_point(RawEntryPoint::video(MEET));
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, format!("09:00 Standup | href={MEET}"));
            assert!(n.display_text.ends_with(&format!("| href={MEET}")));
        }

        #[test]
        fn two_meet_links_fall_back_to_description() {
            let event = timed("Town hall", "2025-03-14T09:00:00+01:00")
                .with_entry_point(RawEntryPoint::video(MEET))
                .with_entry_point(RawEntryPoint::video("https://meet.google.com/other"))
                .with_description(format!("Stream: {BLUEJEANS}"));
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, format!("09:00 Town hall | href={BLUEJEANS}"));
        }

        #[test]
        fn two_meet_links_and_no_description_match() {
            let event = timed("Town hall", "2025-03-14T09:00:00+01:00")
                .with_entry_point(RawEntryPoint::video(MEET))
                .with_entry_point(RawEntryPoint::video("https://meet.google.com/other"))
                .with_description("no link here");
            let n = normalize_at(&event, &now()).unwrap();
            assert_eq!(n.display_text, "09:00 Town hall");
            assert!(!n.display_text.contains("href"));
        }
    }

    mod acceptance {
        use super::*;

        #[test]
        fn single_accepted_self_entry() {
            let event = timed("x", "2025-03-14T09:00:00Z")
                .with_attendee(RawAttendee::other("a@example.com", "declined"))
                .with_attendee(RawAttendee::me("accepted"));
            assert!(is_accepted(&event));
        }

        #[test]
        fn no_self_entry() {
            let event = timed("x", "2025-03-14T09:00:00Z")
                .with_attendee(RawAttendee::other("a@example.com", "accepted"));
            assert!(!is_accepted(&event));
        }

        #[test]
        fn self_entry_not_accepted() {
            for status in ["tentative", "declined", "needsAction"] {
                let event =
                    timed("x", "2025-03-14T09:00:00Z").with_attendee(RawAttendee::me(status));
                assert!(!is_accepted(&event), "{status}");
            }
        }

        #[test]
        fn multiple_self_entries() {
            let event = timed("x", "2025-03-14T09:00:00Z")
                .with_attendee(RawAttendee::me("accepted"))
                .with_attendee(RawAttendee::me("accepted"));
            assert!(!is_accepted(&event));
        }

        #[test]
        fn self_entry_without_status() {
            let event = timed("x", "2025-03-14T09:00:00Z").with_attendee(RawAttendee {
                email: None,
                is_self: true,
                response_status: None,
            });
            assert!(!is_accepted(&event));
        }
    }

    mod ranking {
        use super::*;

        #[test]
        fn buckets() {
            let accepted = timed("a", "2025-03-14T18:00:00+01:00")
                .with_attendee(RawAttendee::me("accepted"));
            let timed_today = timed("b", "2025-03-14T09:00:00+01:00");
            let all_day_today = all_day("c", "2025-03-14");
            let accepted_all_day = all_day("d", "2025-03-14").with_attendee(RawAttendee::me("accepted"));
            let tomorrow = timed("e", "2025-03-15T09:00:00+01:00")
                .with_attendee(RawAttendee::me("accepted"));

            let bucket = |e: &RawEvent| normalize_at(e, &now()).unwrap().sort_key.bucket;
            assert_eq!(bucket(&accepted), Bucket::AcceptedToday);
            assert_eq!(bucket(&timed_today), Bucket::TimedToday);
            assert_eq!(bucket(&all_day_today), Bucket::AllDayToday);
            assert_eq!(bucket(&accepted_all_day), Bucket::AcceptedToday);
            assert_eq!(bucket(&tomorrow), Bucket::Later);
        }

        #[test]
        fn tiebreak_is_absolute_distance() {
            let before = timed("before", "2025-03-14T08:25:00+01:00");
            let after = timed("after", "2025-03-14T08:35:00+01:00");
            let b = normalize_at(&before, &now()).unwrap();
            let a = normalize_at(&after, &now()).unwrap();
            assert_eq!(b.sort_key, a.sort_key);
            assert_eq!(b.sort_key.distance, TimeDelta::minutes(5));
        }

        #[test]
        fn all_day_distance_is_from_local_midnight() {
            let n = normalize_at(&all_day("c", "2025-03-14"), &now()).unwrap();
            assert_eq!(n.sort_key.distance, TimeDelta::minutes(8 * 60 + 30));
        }

        #[test]
        fn accepted_beats_closer_unaccepted() {
            let far_accepted = timed("far", "2025-03-14T23:00:00+01:00")
                .with_attendee(RawAttendee::me("accepted"));
            let close = timed("close", "2025-03-14T08:31:00+01:00");
            let far = normalize_at(&far_accepted, &now()).unwrap();
            let close = normalize_at(&close, &now()).unwrap();
            assert!(far.sort_key < close.sort_key);
        }
    }

    #[test]
    fn malformed_start_is_an_error() {
        let event = timed("x", "tomorrow at nine");
        assert!(normalize_at(&event, &now()).is_err());
    }

    #[test]
    fn input_is_not_mutated() {
        let event = timed("Standup", "2025-03-14T09:00:00+01:00")
            .with_entry_point(RawEntryPoint::video(MEET));
        let before = event.clone();
        let _ = normalize_at(&event, &now()).unwrap();
        assert_eq!(event, before);
    }

    #[test]
    fn local_entry_point() {
        let event = timed("Standup", "2025-03-14T09:00:00+01:00");
        let n = normalize(&event, Local::now()).unwrap();
        assert!(n.display_text.ends_with("Standup"));
    }
}
