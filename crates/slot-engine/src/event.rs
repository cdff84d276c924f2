//! Value types shared by the normalizer, availability engine, and conflict
//! detector.
//!
//! The central distinction (and the central risk in this domain) is between
//! an absolute, zone-anchored [`Instant`] and a zone-less civil-time value.
//! [`EventTime`] keeps the two apart at the type level so an ambiguous value
//! can never be compared for overlap before it has been resolved.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

// ── Instant ─────────────────────────────────────────────────────────────────

/// An absolute point in time, carried together with the IANA zone used to
/// render it as civil time.
///
/// Equality and ordering consider **only** the absolute value: two `Instant`s
/// representing the same moment are equal regardless of the zone attached to
/// each. The zone is display metadata, never part of the identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Instant {
    /// The absolute point in time.
    pub utc: DateTime<Utc>,
    /// The IANA zone used when rendering this instant as civil time.
    pub zone: Tz,
}

impl Instant {
    pub fn new(utc: DateTime<Utc>, zone: Tz) -> Self {
        Self { utc, zone }
    }

    /// The same absolute instant, re-anchored for display in `zone`.
    pub fn in_zone(self, zone: Tz) -> Self {
        Self { utc: self.utc, zone }
    }

    /// This instant rendered as civil time in its display zone.
    pub fn local(&self) -> DateTime<Tz> {
        self.utc.with_timezone(&self.zone)
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.utc.cmp(&other.utc)
    }
}

// ── EventTime ───────────────────────────────────────────────────────────────

/// A parsed raw time value, before zone resolution.
///
/// `Civil` values are a data-quality defect: the normalizer coerces them into
/// absolute instants using its configured fallback zone and reports the
/// coercion, rather than silently treating them as unambiguous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventTime {
    /// Zone-anchored and unambiguous.
    Absolute(DateTime<Utc>),
    /// Wall-clock value with no zone attached; must be resolved before any
    /// overlap comparison.
    Civil(NaiveDateTime),
}

// ── Raw collector input ─────────────────────────────────────────────────────

/// A raw event as delivered by an upstream calendar collector.
///
/// Upstream data sources are not trusted: time fields may be null, missing,
/// non-string, or unparseable, and may lack zone information. The normalizer
/// validates and coerces each record, skipping malformed ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub start: Option<serde_json::Value>,
    #[serde(default)]
    pub end: Option<serde_json::Value>,
    /// Optional provider-supplied IANA zone for interpreting zone-less times.
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl RawEvent {
    /// An event with string start/end values, as a collector would hand over.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(serde_json::Value::String(start.into())),
            end: Some(serde_json::Value::String(end.into())),
            zone: None,
            attendees: Vec::new(),
        }
    }

    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }
}

/// An unordered collection of raw events belonging to one person or resource.
///
/// A calendar with zero valid events is a fully free calendar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Calendar {
    /// Opaque identifier for this calendar (e.g., "work-google", "alice").
    pub calendar_id: String,
    pub events: Vec<RawEvent>,
}

impl Calendar {
    pub fn new(calendar_id: impl Into<String>, events: Vec<RawEvent>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            events,
        }
    }
}

// ── Normalized values ───────────────────────────────────────────────────────

/// A validated busy interval. Invariant: `start < end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: Instant,
    pub end: Instant,
    pub attendees: Vec<String>,
}

impl BusyInterval {
    pub fn new(start: Instant, end: Instant) -> Self {
        Self {
            start,
            end,
            attendees: Vec::new(),
        }
    }

    pub fn with_attendees<I, S>(mut self, attendees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attendees = attendees.into_iter().map(Into::into).collect();
        self
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end.utc - self.start.utc).num_minutes()
    }
}

/// Per-day civil-time window during which free slots may be proposed,
/// expressed as hours-of-day in the caller's reference zone.
///
/// `end_hour` may be 24, meaning midnight at the start of the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl WorkingHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }
}

/// A maximal free time range within working hours, anchored for display in
/// the caller's reference zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: Instant,
    pub end: Instant,
    pub duration_minutes: i64,
}

/// An attendee appearing in two or more meetings whose intervals overlap.
///
/// `meetings` lists every meeting of that attendee that participates in at
/// least one overlapping pair, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeConflict {
    pub attendee: String,
    pub meetings: Vec<BusyInterval>,
}
