//! # slot-engine
//!
//! Timezone-safe availability and conflict detection for multi-calendar
//! scheduling.
//!
//! Given one or more calendars of busy time, the engine computes
//! mutually-free time slots and detects scheduling conflicts — including
//! cross-timezone overlap and multi-attendee double-booking — correctly
//! across DST transitions, inter-meeting buffers, and working-hours windows.
//! Every time value entering the engine is first forced through the
//! time-safety normalizer, so ambiguous wall-clock values can never be
//! compared for overlap.
//!
//! The engine is pure and stateless: no I/O, no shared mutable state, fresh
//! value objects per call. Recurrence expansion, data collection, and
//! persistence belong to upstream collaborators.
//!
//! ## Modules
//!
//! - [`normalize`] — validate/coerce raw events into unambiguous instants
//! - [`availability`] — free slots per calendar or intersected across many
//! - [`conflict`] — overlap tests, overlap magnitude, attendee double-booking
//! - [`event`] — the value objects shared by all components
//! - [`error`] — error types

pub mod availability;
pub mod conflict;
pub mod error;
pub mod event;
mod interval;
pub mod normalize;

pub use availability::{find_common_slots, find_free_slots, Availability};
pub use conflict::{detect_timezone_conflict, find_attendee_conflicts, has_conflict, overlap_minutes};
pub use error::EngineError;
pub use event::{
    AttendeeConflict, BusyInterval, Calendar, EventTime, FreeSlot, Instant, RawEvent, WorkingHours,
};
pub use normalize::{normalize_to_zone, parse_zone, Diagnostic, DiagnosticKind, Normalizer};
