//! Tests for single-calendar free-slot computation.
//!
//! Times are anchored on 2026-03-16, a Monday after the US spring-forward
//! transition, so Eastern time is EDT (UTC-4) throughout unless a test says
//! otherwise.

use chrono::{NaiveDate, Timelike};
use serde_json::json;
use slot_engine::{
    find_free_slots, Calendar, DiagnosticKind, EngineError, Normalizer, RawEvent, WorkingHours,
};

const EASTERN: &str = "America/New_York";

fn normalizer() -> Normalizer {
    Normalizer::new(chrono_tz::America::New_York)
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn calendar(events: Vec<RawEvent>) -> Calendar {
    Calendar::new("work", events)
}

#[test]
fn single_meeting_splits_the_working_day() {
    // Meeting: 14:00-15:00 Eastern. Working hours 9-17, 60-minute request.
    // Expected: 09:00-14:00 (300 min) and 15:00-17:00 (120 min).
    let cal = calendar(vec![RawEvent::new(
        "2026-03-16T14:00:00-04:00",
        "2026-03-16T15:00:00-04:00",
    )]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        60,
        0,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 2, "one meeting should split the day");
    assert_eq!(result.slots[0].duration_minutes, 300);
    assert_eq!(result.slots[0].start.local().hour(), 9);
    assert_eq!(result.slots[0].end.local().hour(), 14);
    assert_eq!(result.slots[1].duration_minutes, 120);
    assert_eq!(result.slots[1].start.local().hour(), 15);
    assert_eq!(result.slots[1].end.local().hour(), 17);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn buffer_keeps_slots_clear_of_adjacent_meetings() {
    // Back-to-back meetings 10:00-11:00 and 11:00-12:00 with a 15-minute
    // buffer: no 30-minute slot may begin at exactly 11:00. The buffered
    // blocks merge into 09:45-12:15.
    let cal = calendar(vec![
        RawEvent::new("2026-03-16T10:00:00-04:00", "2026-03-16T11:00:00-04:00"),
        RawEvent::new("2026-03-16T11:00:00-04:00", "2026-03-16T12:00:00-04:00"),
    ]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        30,
        15,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 2);

    // 09:00-09:45 (45 min) — the buffer eats into the morning gap.
    assert_eq!(result.slots[0].duration_minutes, 45);
    assert_eq!(result.slots[0].end.local().hour(), 9);
    assert_eq!(result.slots[0].end.local().minute(), 45);

    // 12:15-17:00 — nothing may start before the buffer clears.
    assert_eq!(result.slots[1].start.local().hour(), 12);
    assert_eq!(result.slots[1].start.local().minute(), 15);

    for slot in &result.slots {
        let local = slot.start.local();
        assert!(
            !(local.hour() == 11 && local.minute() == 0),
            "no slot may begin at exactly 11:00 with a 15-minute buffer"
        );
    }
}

#[test]
fn slots_stay_inside_working_hours() {
    let cal = calendar(vec![
        RawEvent::new("2026-03-16T07:00:00-04:00", "2026-03-16T09:30:00-04:00"),
        RawEvent::new("2026-03-16T12:00:00-04:00", "2026-03-16T13:00:00-04:00"),
        RawEvent::new("2026-03-16T16:30:00-04:00", "2026-03-16T19:00:00-04:00"),
    ]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        30,
        0,
        EASTERN,
    )
    .unwrap();

    assert!(!result.slots.is_empty());
    for slot in &result.slots {
        let start = slot.start.local();
        let end = slot.end.local();
        assert!(start.hour() >= 9, "slot starts before working hours: {start}");
        assert!(
            end.hour() < 17 || (end.hour() == 17 && end.minute() == 0),
            "slot ends after working hours: {end}"
        );
    }
}

#[test]
fn empty_calendar_is_fully_free() {
    let result = find_free_slots(
        &normalizer(),
        &calendar(vec![]),
        day(),
        WorkingHours::new(9, 17),
        60,
        0,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 1);
    assert_eq!(result.slots[0].duration_minutes, 480); // 8 hours
    assert!(result.slots[0].duration_minutes >= 420);
}

#[test]
fn malformed_events_are_skipped_not_fatal() {
    // Null times, a numeric time, an unparseable string, and a missing end —
    // only the final valid meeting may affect the result.
    let cal = calendar(vec![
        RawEvent::default(),
        RawEvent {
            start: Some(json!(42)),
            end: Some(json!("2026-03-16T11:00:00-04:00")),
            ..Default::default()
        },
        RawEvent::new("not-a-time", "2026-03-16T11:00:00-04:00"),
        RawEvent {
            start: Some(json!("2026-03-16T10:00:00-04:00")),
            end: None,
            ..Default::default()
        },
        RawEvent::new("2026-03-16T14:00:00-04:00", "2026-03-16T15:00:00-04:00"),
    ]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        60,
        0,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 2, "only the valid meeting splits the day");
    assert_eq!(result.slots[0].duration_minutes, 300);
    assert_eq!(result.slots[1].duration_minutes, 120);
    assert!(
        result.diagnostics.len() >= 4,
        "each malformed record must be reported: {:?}",
        result.diagnostics
    );
}

#[test]
fn inverted_interval_is_skipped_with_diagnostic() {
    let cal = calendar(vec![RawEvent::new(
        "2026-03-16T15:00:00-04:00",
        "2026-03-16T14:00:00-04:00",
    )]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        60,
        0,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 1, "inverted event must not block the day");
    assert_eq!(result.slots[0].duration_minutes, 480);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d.kind, DiagnosticKind::EmptyInterval)));
}

#[test]
fn zone_less_event_is_coerced_with_fallback_zone() {
    // Same meeting as the zoned case, but stated as bare wall-clock time.
    // The fallback zone (Eastern) makes it 14:00-15:00 EDT.
    let cal = calendar(vec![RawEvent::new(
        "2026-03-16T14:00:00",
        "2026-03-16T15:00:00",
    )]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        60,
        0,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 2);
    assert_eq!(result.slots[0].duration_minutes, 300);
    assert_eq!(result.slots[1].duration_minutes, 120);

    let coercions = result
        .diagnostics
        .iter()
        .filter(|d| matches!(d.kind, DiagnosticKind::CoercedCivilTime { .. }))
        .count();
    assert_eq!(coercions, 2, "both fields were coerced and must be reported");
}

#[test]
fn duration_that_cannot_fit_returns_empty_list() {
    let result = find_free_slots(
        &normalizer(),
        &calendar(vec![]),
        day(),
        WorkingHours::new(9, 10),
        120,
        0,
        EASTERN,
    )
    .unwrap();

    assert!(result.slots.is_empty(), "a 2-hour slot cannot fit a 1-hour day");
}

#[test]
fn slots_are_chronologically_ordered() {
    let cal = calendar(vec![
        RawEvent::new("2026-03-16T15:00:00-04:00", "2026-03-16T16:00:00-04:00"),
        RawEvent::new("2026-03-16T10:00:00-04:00", "2026-03-16T11:00:00-04:00"),
        RawEvent::new("2026-03-16T12:00:00-04:00", "2026-03-16T13:00:00-04:00"),
    ]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        30,
        0,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 4);
    for pair in result.slots.windows(2) {
        assert!(
            pair[0].end.utc <= pair[1].start.utc,
            "slots must be sorted and disjoint"
        );
    }
}

#[test]
fn dst_transition_day_uses_the_offset_in_effect() {
    // 2026-03-08 is the US spring-forward date. By 09:00 Eastern the zone is
    // already EDT (UTC-4): a 17:00Z-18:00Z meeting is 13:00-14:00 local. An
    // engine using the fixed winter offset would place it at 12:00 local.
    let date = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
    let cal = calendar(vec![RawEvent::new(
        "2026-03-08T17:00:00Z",
        "2026-03-08T18:00:00Z",
    )]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        date,
        WorkingHours::new(9, 17),
        60,
        0,
        EASTERN,
    )
    .unwrap();

    assert_eq!(result.slots.len(), 2);
    assert_eq!(result.slots[0].duration_minutes, 240); // 09:00-13:00
    assert_eq!(result.slots[1].duration_minutes, 180); // 14:00-17:00
    assert_eq!(result.slots[1].start.local().hour(), 14);
}

#[test]
fn slots_are_rendered_in_the_caller_zone() {
    let cal = calendar(vec![RawEvent::new(
        // Stated in Pacific time; rendering zone is Eastern.
        "2026-03-16T11:00:00-07:00",
        "2026-03-16T12:00:00-07:00",
    )]);

    let result = find_free_slots(
        &normalizer(),
        &cal,
        day(),
        WorkingHours::new(9, 17),
        60,
        0,
        EASTERN,
    )
    .unwrap();

    // 11:00-12:00 Pacific is 14:00-15:00 Eastern.
    assert_eq!(result.slots.len(), 2);
    assert_eq!(result.slots[0].end.local().hour(), 14);
    for slot in &result.slots {
        assert_eq!(slot.start.zone, chrono_tz::America::New_York);
        assert_eq!(slot.end.zone, chrono_tz::America::New_York);
    }
}

#[test]
fn unknown_zone_argument_is_a_fatal_caller_error() {
    let result = find_free_slots(
        &normalizer(),
        &calendar(vec![]),
        day(),
        WorkingHours::new(9, 17),
        60,
        0,
        "Mars/Olympus_Mons",
    );

    assert!(matches!(result, Err(EngineError::InvalidTimezone(_))));
}

#[test]
fn negative_buffer_is_a_fatal_caller_error() {
    let result = find_free_slots(
        &normalizer(),
        &calendar(vec![RawEvent::new(
            "2026-03-16T10:00:00-04:00",
            "2026-03-16T11:00:00-04:00",
        )]),
        day(),
        WorkingHours::new(9, 17),
        60,
        -15,
        EASTERN,
    );

    assert!(matches!(result, Err(EngineError::InvalidBuffer(_))));
}

#[test]
fn inverted_working_hours_are_a_fatal_caller_error() {
    let result = find_free_slots(
        &normalizer(),
        &calendar(vec![]),
        day(),
        WorkingHours::new(17, 9),
        60,
        0,
        EASTERN,
    );

    assert!(matches!(result, Err(EngineError::InvalidWorkingHours(_))));
}
