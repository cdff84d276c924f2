//! Free-slot computation over one or more calendars.
//!
//! Busy intervals are normalized, expanded by the requested buffer, clipped
//! to the working-hours window for the query date, and merged into maximal
//! busy blocks; the gaps between blocks that fit the requested duration come
//! back as [`FreeSlot`]s. Slots span the entire maximal gap — they are never
//! subdivided into duration-sized pieces.

use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::event::{Calendar, FreeSlot, Instant, WorkingHours};
use crate::interval::{self, Span};
use crate::normalize::{parse_zone, resolve_local, Diagnostic, Normalizer};

/// Free slots plus the data-quality diagnostics accumulated while
/// normalizing the input calendars.
#[derive(Debug, Clone)]
pub struct Availability {
    /// Chronologically ordered, maximal free slots in the caller's zone.
    pub slots: Vec<FreeSlot>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Find free time slots in a single calendar on `date`.
///
/// # Arguments
///
/// - `calendar` — raw busy events; malformed records are skipped, not fatal
/// - `date` — the calendar day to query, interpreted in `zone`
/// - `working_hours` — civil hours-of-day bounding the proposed slots
/// - `duration_minutes` — minimum length a gap must have to be reported
/// - `buffer_minutes` — required clearance before and after every meeting
/// - `zone` — IANA zone anchoring the window and the returned slots
///
/// An empty or entirely-malformed calendar yields one slot covering the whole
/// working-hours window (when it fits the duration). A duration that cannot
/// fit the window returns an empty list, not an error.
///
/// # Errors
///
/// Returns [`EngineError::InvalidTimezone`] for an unrecognized `zone`,
/// [`EngineError::InvalidWorkingHours`] for an invalid hour range, and
/// [`EngineError::InvalidBuffer`] for a negative buffer — all caller errors,
/// never data-quality recoveries.
pub fn find_free_slots(
    normalizer: &Normalizer,
    calendar: &Calendar,
    date: NaiveDate,
    working_hours: WorkingHours,
    duration_minutes: i64,
    buffer_minutes: i64,
    zone: &str,
) -> Result<Availability> {
    let tz = parse_zone(zone)?;
    let window = day_window(tz, date, working_hours)?;
    let buffer = buffer_duration(buffer_minutes)?;

    let mut diagnostics = Vec::new();
    let free = free_spans(normalizer, calendar, window, buffer, tz, &mut diagnostics);

    Ok(Availability {
        slots: to_slots(free, duration_minutes, tz),
        diagnostics,
    })
}

/// Find time slots simultaneously free in *every* input calendar.
///
/// Per-calendar free time is computed with the same buffer, working hours,
/// and zone, then intersected across all calendars; only intersection
/// segments of at least `duration_minutes` are returned. All slots are
/// expressed in the caller's `zone`, regardless of the zones the source
/// events were originally stated in.
///
/// With no input calendars the conjunction is vacuous and the whole window
/// is free.
///
/// # Errors
///
/// Same caller-error conditions as [`find_free_slots`].
pub fn find_common_slots(
    normalizer: &Normalizer,
    calendars: &[Calendar],
    date: NaiveDate,
    working_hours: WorkingHours,
    duration_minutes: i64,
    buffer_minutes: i64,
    zone: &str,
) -> Result<Availability> {
    let tz = parse_zone(zone)?;
    let window = day_window(tz, date, working_hours)?;
    let buffer = buffer_duration(buffer_minutes)?;

    let mut diagnostics = Vec::new();
    let mut common: Option<Vec<Span>> = None;

    for calendar in calendars {
        let free = free_spans(normalizer, calendar, window, buffer, tz, &mut diagnostics);
        common = Some(match common {
            Some(acc) => interval::intersect(&acc, &free),
            None => free,
        });
    }

    let free = common.unwrap_or_else(|| vec![window]);

    Ok(Availability {
        slots: to_slots(free, duration_minutes, tz),
        diagnostics,
    })
}

/// Normalize one calendar and return its free spans within the window, with
/// every busy interval expanded by `buffer` on both ends.
///
/// Buffer expansion happens before clipping, so a meeting just outside the
/// window still pushes its clearance into it.
fn free_spans(
    normalizer: &Normalizer,
    calendar: &Calendar,
    window: Span,
    buffer: Duration,
    tz: Tz,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Span> {
    let normalized = normalizer.normalize_calendar(calendar, tz);
    diagnostics.extend(normalized.diagnostics);

    let buffered = normalized
        .intervals
        .iter()
        .map(|interval| (interval.start.utc - buffer, interval.end.utc + buffer));
    let busy = interval::clip_and_merge(buffered, window);

    interval::gaps(window, &busy)
}

/// A negative buffer would invert the expanded spans and corrupt the merge,
/// so it is rejected up front as a caller error.
fn buffer_duration(minutes: i64) -> Result<Duration> {
    if minutes < 0 {
        return Err(EngineError::InvalidBuffer(format!(
            "{minutes} minutes; the buffer must be non-negative"
        )));
    }
    Ok(Duration::minutes(minutes))
}

fn to_slots(free: Vec<Span>, duration_minutes: i64, tz: Tz) -> Vec<FreeSlot> {
    free.into_iter()
        .filter(|&(start, end)| (end - start).num_minutes() >= duration_minutes)
        .map(|(start, end)| FreeSlot {
            start: Instant::new(start, tz),
            end: Instant::new(end, tz),
            duration_minutes: (end - start).num_minutes(),
        })
        .collect()
}

/// The absolute bounds of the working-hours window on `date` in `tz`,
/// respecting the zone's actual offset transitions for that day.
fn day_window(tz: Tz, date: NaiveDate, hours: WorkingHours) -> Result<Span> {
    if hours.start_hour >= hours.end_hour || hours.end_hour > 24 {
        return Err(EngineError::InvalidWorkingHours(format!(
            "{}..{} is not a valid hours-of-day range",
            hours.start_hour, hours.end_hour
        )));
    }
    let start = anchor_hour(tz, date, hours.start_hour)?;
    let end = anchor_hour(tz, date, hours.end_hour)?;
    Ok((start, end))
}

fn anchor_hour(tz: Tz, date: NaiveDate, hour: u32) -> Result<chrono::DateTime<Utc>> {
    // Hour 24 means midnight at the start of the next day.
    let (date, hour) = if hour == 24 {
        let next = date.succ_opt().ok_or_else(|| {
            EngineError::InvalidWorkingHours(format!("no day after {date}"))
        })?;
        (next, 0)
    } else {
        (date, hour)
    };

    let naive = date.and_hms_opt(hour, 0, 0).ok_or_else(|| {
        EngineError::InvalidWorkingHours(format!("hour {hour} is out of range"))
    })?;

    resolve_local(tz, naive)
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| {
            EngineError::InvalidWorkingHours(format!("{naive} cannot be resolved in {tz}"))
        })
}
