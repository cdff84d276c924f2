//! Pairwise and group-level conflict analysis.
//!
//! All comparisons happen at the absolute-instant level, so two events stated
//! in different zones that cover the same absolute range are conflicting no
//! matter how their civil-time representations differ. Adjacent events
//! (where one ends exactly when another starts) are NOT conflicts.

use std::collections::{BTreeMap, BTreeSet};

use crate::event::{AttendeeConflict, BusyInterval};

/// True iff the two intervals overlap at the absolute-instant level.
///
/// Two intervals overlap iff `a.start < b.end && b.start < a.end`; this
/// excludes the adjacent case where `a.end == b.start`. Symmetric by
/// construction.
pub fn has_conflict(a: &BusyInterval, b: &BusyInterval) -> bool {
    a.start < b.end && b.start < a.end
}

/// Cross-zone conflict check: compares the events' absolute instants
/// directly, so differing display zones cannot mask an overlap.
pub fn detect_timezone_conflict(a: &BusyInterval, b: &BusyInterval) -> bool {
    has_conflict(a, b)
}

/// Magnitude of temporal overlap in minutes.
///
/// The overlap is `min(a.end, b.end) - max(a.start, b.start)`, rounded up to
/// whole minutes so a sub-minute overlap still reports 1 rather than 0.
/// Returns 0 exactly when [`has_conflict`] is false; symmetric in its
/// arguments.
pub fn overlap_minutes(a: &BusyInterval, b: &BusyInterval) -> i64 {
    if !has_conflict(a, b) {
        return 0;
    }
    let overlap_start = a.start.utc.max(b.start.utc);
    let overlap_end = a.end.utc.min(b.end.utc);
    ((overlap_end - overlap_start).num_seconds() + 59) / 60
}

/// Find attendees double-booked across a set of meetings.
///
/// For every attendee appearing in two or more meetings, checks each pair of
/// that attendee's meetings for overlap. An attendee with at least one
/// overlapping pair produces one [`AttendeeConflict`] listing all of their
/// meetings that participate in some overlapping pair, in chronological
/// order. Attendees whose meetings are all disjoint produce no entry.
pub fn find_attendee_conflicts(meetings: &[BusyInterval]) -> Vec<AttendeeConflict> {
    // Group meeting indices per attendee. BTreeMap keeps the output order
    // deterministic across calls.
    let mut by_attendee: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (index, meeting) in meetings.iter().enumerate() {
        for attendee in &meeting.attendees {
            let entries = by_attendee.entry(attendee.as_str()).or_default();
            // An attendee listed twice on one meeting still counts once.
            if entries.last() != Some(&index) {
                entries.push(index);
            }
        }
    }

    let mut conflicts = Vec::new();
    for (attendee, indices) in by_attendee {
        if indices.len() < 2 {
            continue;
        }

        let mut involved: BTreeSet<usize> = BTreeSet::new();
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                if has_conflict(&meetings[i], &meetings[j]) {
                    involved.insert(i);
                    involved.insert(j);
                }
            }
        }
        if involved.is_empty() {
            continue;
        }

        let mut attendee_meetings: Vec<BusyInterval> =
            involved.into_iter().map(|i| meetings[i].clone()).collect();
        attendee_meetings.sort_by_key(|m| (m.start, m.end));

        conflicts.push(AttendeeConflict {
            attendee: attendee.to_string(),
            meetings: attendee_meetings,
        });
    }

    conflicts
}
