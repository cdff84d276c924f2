//! Time-safety normalization for untrusted calendar data.
//!
//! Guarantees that every time value entering the engine is an unambiguous,
//! zone-anchored instant. Zone-less ("civil") values are coerced using an
//! explicit fallback zone, malformed records are dropped, and every recovery
//! is reported on a [`Diagnostic`] side channel as well as via
//! `tracing::warn!` — upstream data imperfections never fail a call.
//!
//! Only the *caller's* zone argument is trusted configuration: an
//! unrecognized zone passed to [`normalize_to_zone`] (or any other zone-aware
//! entry point) is a programming error and fails immediately.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::event::{BusyInterval, Calendar, EventTime, Instant, RawEvent};

// ── Diagnostics ─────────────────────────────────────────────────────────────

/// Which time field of an event a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeField {
    Start,
    End,
}

/// Why an event was skipped or coerced during normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiagnosticKind {
    /// The field was null or missing entirely.
    MissingTime { field: TimeField },
    /// The field held a non-string value or a string no supported format
    /// could parse.
    UnparseableTime { field: TimeField, value: String },
    /// The field held a zone-less wall-clock value that was coerced into the
    /// named zone. The event is kept.
    CoercedCivilTime { field: TimeField, zone: String },
    /// The event carried a zone hint that is not a recognized IANA
    /// identifier; the fallback zone was used instead. The event is kept.
    UnknownEventZone { zone: String },
    /// `start >= end` after resolution.
    EmptyInterval,
}

/// A non-fatal data-quality finding for one event of one calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub calendar_id: String,
    /// Position of the offending event in the calendar's input list.
    pub index: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// True when the event was dropped (as opposed to kept after coercion).
    pub fn is_skip(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::MissingTime { .. }
                | DiagnosticKind::UnparseableTime { .. }
                | DiagnosticKind::EmptyInterval
        )
    }
}

/// The result of normalizing one calendar: validated intervals plus the
/// diagnostics accumulated along the way.
#[derive(Debug, Clone)]
pub struct NormalizedCalendar {
    pub intervals: Vec<BusyInterval>,
    pub diagnostics: Vec<Diagnostic>,
}

// ── Normalizer ──────────────────────────────────────────────────────────────

/// Validates and coerces raw collector events into unambiguous
/// [`BusyInterval`]s.
///
/// The fallback zone for zone-less inputs is explicit, required
/// configuration — there is no hidden global default.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    fallback: Tz,
}

impl Normalizer {
    pub fn new(fallback: Tz) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> Tz {
        self.fallback
    }

    /// Normalize a calendar's raw events into busy intervals anchored for
    /// display in `zone`.
    ///
    /// Malformed events (missing/invalid start or end, `start >= end`) are
    /// skipped; zone-less events are coerced using the event's own zone hint
    /// when valid, else the fallback zone. Every skip or coercion appears in
    /// the returned diagnostics.
    pub fn normalize_calendar(&self, calendar: &Calendar, zone: Tz) -> NormalizedCalendar {
        let mut intervals = Vec::new();
        let mut diagnostics = Vec::new();

        for (index, event) in calendar.events.iter().enumerate() {
            let coercion_zone = self.event_zone(calendar, index, event, &mut diagnostics);

            let start = self.resolve_field(
                calendar,
                index,
                TimeField::Start,
                event.start.as_ref(),
                coercion_zone,
                &mut diagnostics,
            );
            let end = self.resolve_field(
                calendar,
                index,
                TimeField::End,
                event.end.as_ref(),
                coercion_zone,
                &mut diagnostics,
            );
            let (Some(start), Some(end)) = (start, end) else {
                continue;
            };

            if start >= end {
                tracing::warn!(
                    calendar = %calendar.calendar_id,
                    index,
                    "skipping event with empty or inverted interval"
                );
                diagnostics.push(Diagnostic {
                    calendar_id: calendar.calendar_id.clone(),
                    index,
                    kind: DiagnosticKind::EmptyInterval,
                });
                continue;
            }

            intervals.push(BusyInterval {
                start: Instant::new(start, zone),
                end: Instant::new(end, zone),
                attendees: event.attendees.clone(),
            });
        }

        NormalizedCalendar {
            intervals,
            diagnostics,
        }
    }

    /// The zone used to resolve this event's civil-time values: the event's
    /// own hint when valid, else the configured fallback. An unknown hint is
    /// upstream data, so it degrades with a diagnostic rather than failing.
    fn event_zone(
        &self,
        calendar: &Calendar,
        index: usize,
        event: &RawEvent,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Tz {
        let Some(hint) = &event.zone else {
            return self.fallback;
        };
        match hint.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(
                    calendar = %calendar.calendar_id,
                    index,
                    zone = %hint,
                    "unknown event zone, using fallback"
                );
                diagnostics.push(Diagnostic {
                    calendar_id: calendar.calendar_id.clone(),
                    index,
                    kind: DiagnosticKind::UnknownEventZone { zone: hint.clone() },
                });
                self.fallback
            }
        }
    }

    fn resolve_field(
        &self,
        calendar: &Calendar,
        index: usize,
        field: TimeField,
        value: Option<&serde_json::Value>,
        coercion_zone: Tz,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<DateTime<Utc>> {
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => {
                diagnostics.push(Diagnostic {
                    calendar_id: calendar.calendar_id.clone(),
                    index,
                    kind: DiagnosticKind::MissingTime { field },
                });
                return None;
            }
        };

        let Some(text) = value.as_str() else {
            tracing::warn!(
                calendar = %calendar.calendar_id,
                index,
                ?field,
                "skipping event with non-string time value"
            );
            diagnostics.push(Diagnostic {
                calendar_id: calendar.calendar_id.clone(),
                index,
                kind: DiagnosticKind::UnparseableTime {
                    field,
                    value: value.to_string(),
                },
            });
            return None;
        };

        match parse_event_time(text) {
            Some(EventTime::Absolute(utc)) => Some(utc),
            Some(EventTime::Civil(naive)) => match resolve_local(coercion_zone, naive) {
                Some(local) => {
                    tracing::warn!(
                        calendar = %calendar.calendar_id,
                        index,
                        ?field,
                        zone = %coercion_zone,
                        "zone-less time coerced into fallback zone"
                    );
                    diagnostics.push(Diagnostic {
                        calendar_id: calendar.calendar_id.clone(),
                        index,
                        kind: DiagnosticKind::CoercedCivilTime {
                            field,
                            zone: coercion_zone.to_string(),
                        },
                    });
                    Some(local.with_timezone(&Utc))
                }
                None => {
                    diagnostics.push(Diagnostic {
                        calendar_id: calendar.calendar_id.clone(),
                        index,
                        kind: DiagnosticKind::UnparseableTime {
                            field,
                            value: text.to_string(),
                        },
                    });
                    None
                }
            },
            None => {
                tracing::warn!(
                    calendar = %calendar.calendar_id,
                    index,
                    ?field,
                    value = %text,
                    "skipping event with unparseable time value"
                );
                diagnostics.push(Diagnostic {
                    calendar_id: calendar.calendar_id.clone(),
                    index,
                    kind: DiagnosticKind::UnparseableTime {
                        field,
                        value: text.to_string(),
                    },
                });
                None
            }
        }
    }
}

// ── Free functions ──────────────────────────────────────────────────────────

/// Parse a caller-supplied IANA zone identifier.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTimezone`] if `zone` is not a recognized
/// identifier. This is a caller programming error, never a data-quality
/// issue, and is not silently recovered.
pub fn parse_zone(zone: &str) -> Result<Tz> {
    zone.parse::<Tz>()
        .map_err(|_| EngineError::InvalidTimezone(zone.to_string()))
}

/// Re-express an interval's instants for display in `target_zone` without
/// changing the absolute instants they represent.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTimezone`] if `target_zone` is unknown.
pub fn normalize_to_zone(interval: &BusyInterval, target_zone: &str) -> Result<BusyInterval> {
    let tz = parse_zone(target_zone)?;
    Ok(BusyInterval {
        start: interval.start.in_zone(tz),
        end: interval.end.in_zone(tz),
        attendees: interval.attendees.clone(),
    })
}

/// Parse one raw time string into either an absolute instant (RFC 3339 with
/// offset) or a civil wall-clock value (no zone information).
pub(crate) fn parse_event_time(text: &str) -> Option<EventTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(EventTime::Absolute(dt.with_timezone(&Utc)));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(EventTime::Civil(naive));
        }
    }
    None
}

/// Resolve a civil value in `tz` against the zone's real offset transitions
/// for that date.
///
/// Ambiguous local times (DST fall-back) take the earliest interpretation;
/// nonexistent local times (spring-forward gap) shift forward one hour and
/// re-resolve.
pub(crate) fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => {
            tracing::warn!(zone = %tz, time = %naive, "ambiguous local time, picking earliest");
            Some(earliest)
        }
        LocalResult::None => {
            tracing::warn!(
                zone = %tz,
                time = %naive,
                "nonexistent local time, shifting forward one hour"
            );
            let shifted = naive + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) => Some(dt),
                LocalResult::Ambiguous(earliest, _) => Some(earliest),
                LocalResult::None => None,
            }
        }
    }
}
