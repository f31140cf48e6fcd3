//! Golden tests for menu output.
//!
//! These tests use insta inline snapshots to pin the exact text the applet
//! receives.

use chrono::{DateTime, FixedOffset, TimeZone};

use crate::format::{MenuRenderer, NO_EVENTS_MESSAGE, REFRESH_LINE, SEPARATOR, write_lines};
use crate::raw_event::{RawAttendee, RawEntryPoint, RawEvent, RawEventTime};

const MEET: &str = "https://meet.google.com/abc-defg-hij";
const BLUEJEANS: &str = "https://primetime.bluejeans.com/a2m/live-event/abcd1234";

/// 2025-03-14 08:30 in a UTC+1 zone.
fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2025, 3, 14, 8, 30, 0)
        .unwrap()
}

fn render(events: &[RawEvent]) -> String {
    MenuRenderer::default()
        .render_at(events, &now())
        .unwrap()
        .join("\n")
}

#[test]
fn empty_calendar() {
    let lines = MenuRenderer::default().render_at(&[], &now()).unwrap();
    assert_eq!(lines, vec![NO_EVENTS_MESSAGE.to_string()]);
    insta::assert_snapshot!(lines.join("\n"), @"No upcoming events found.");
}

#[test]
fn standup_and_holiday() {
    let events = vec![
        RawEvent::new("Holiday", RawEventTime::date("2025-03-14")),
        RawEvent::new("Standup", RawEventTime::date_time("2025-03-14T09:00:00+01:00"))
            .with_attendee(RawAttendee::me("accepted")),
    ];

    insta::assert_snapshot!(render(&events), @r"
09:00 Standup
---
09:00 Standup
Today Holiday
Refresh | refresh=true
");
}

#[test]
fn mixed_week() {
    let events = vec![
        RawEvent::new("Conference", RawEventTime::date("2025-03-20")),
        RawEvent::new("Webinar", RawEventTime::date_time("2025-03-15T17:00:00+01:00"))
            .with_description(format!("Watch live: {BLUEJEANS}")),
        RawEvent::new("Company holiday", RawEventTime::date("2025-03-14")),
        RawEvent::new("Team lunch", RawEventTime::date_time("2025-03-14T12:00:00+01:00"))
            .with_attendee(RawAttendee::other("boss@example.com", "accepted"))
            .with_attendee(RawAttendee::me("accepted")),
        RawEvent::new("1:1", RawEventTime::date_time("2025-03-14T09:15:00+01:00"))
            .with_entry_point(RawEntryPoint::video(MEET))
            .with_entry_point(RawEntryPoint::phone("tel:+1-555-0100")),
        RawEvent::new("Planning", RawEventTime::date_time("2025-03-14T07:00:00Z"))
            .with_attendee(RawAttendee::me("tentative")),
    ];

    insta::assert_snapshot!(render(&events), @r"
12:00 Team lunch
---
12:00 Team lunch
08:00 Planning
09:15 1:1 | href=https://meet.google.com/abc-defg-hij
Today Company holiday
2025-03-15 17:00 Webinar | href=https://primetime.bluejeans.com/a2m/live-event/abcd1234
2025-03-20 Conference
Refresh | refresh=true
");
}

#[test]
fn structure_around_headline() {
    let events = vec![
        RawEvent::new("Later", RawEventTime::date_time("2025-03-18T10:00:00+01:00")),
        RawEvent::new("Soon", RawEventTime::date_time("2025-03-14T08:45:00+01:00")),
    ];
    let lines = MenuRenderer::default().render_at(&events, &now()).unwrap();

    assert_eq!(lines.len(), events.len() + 3);
    assert_eq!(lines[0], "08:45 Soon");
    assert_eq!(lines[1], SEPARATOR);
    assert_eq!(lines[2], lines[0]);
    assert_eq!(lines.last().map(String::as_str), Some(REFRESH_LINE));
}

#[test]
fn equal_keys_keep_input_order() {
    let events = vec![
        RawEvent::new("First", RawEventTime::date("2025-03-14")),
        RawEvent::new("Second", RawEventTime::date("2025-03-14")),
    ];

    insta::assert_snapshot!(render(&events), @r"
Today First
---
Today First
Today Second
Refresh | refresh=true
");
}

#[test]
fn malformed_event_fails_the_whole_render() {
    let events = vec![
        RawEvent::new("Fine", RawEventTime::date("2025-03-14")),
        RawEvent::new("Broken", RawEventTime::date_time("14 March, 9am")),
    ];
    assert!(MenuRenderer::default().render_at(&events, &now()).is_err());
}

#[test]
fn write_lines_terminates_each_line() {
    let lines = vec!["a".to_string(), SEPARATOR.to_string(), "b".to_string()];
    let mut out = Vec::new();
    write_lines(&lines, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "a\n---\nb\n");
}
