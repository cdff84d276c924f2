//! Pure interval algebra over sorted lists of absolute-time spans.
//!
//! These helpers operate on plain `(start, end)` pairs in UTC; zone anchoring
//! happens at the engine boundary. All functions return sorted,
//! non-overlapping output.

use chrono::{DateTime, Utc};

pub(crate) type Span = (DateTime<Utc>, DateTime<Utc>);

/// Clip spans to `window`, discard those entirely outside, and merge
/// overlapping or adjacent spans into maximal blocks.
pub(crate) fn clip_and_merge(spans: impl IntoIterator<Item = Span>, window: Span) -> Vec<Span> {
    let (window_start, window_end) = window;
    let mut clipped: Vec<Span> = spans
        .into_iter()
        .filter(|&(start, end)| start < window_end && end > window_start)
        .map(|(start, end)| (start.max(window_start), end.min(window_end)))
        .collect();

    if clipped.is_empty() {
        return Vec::new();
    }

    // Sort by start time (then by end time for stability).
    clipped.sort_by_key(|&(start, end)| (start, end));

    let mut merged: Vec<Span> = Vec::new();
    for (start, end) in clipped {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 {
                // Overlapping or adjacent — extend the current block.
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// The maximal gaps of `window` not covered by `busy`.
///
/// `busy` must be sorted, non-overlapping, and contained in the window —
/// the shape [`clip_and_merge`] produces.
pub(crate) fn gaps(window: Span, busy: &[Span]) -> Vec<Span> {
    let (window_start, window_end) = window;
    let mut out = Vec::new();
    let mut cursor = window_start;

    for &(busy_start, busy_end) in busy {
        if cursor < busy_start {
            out.push((cursor, busy_start));
        }
        cursor = cursor.max(busy_end);
    }

    if cursor < window_end {
        out.push((cursor, window_end));
    }

    out
}

/// Pairwise intersection of two sorted, non-overlapping span lists.
pub(crate) fn intersect(a: &[Span], b: &[Span]) -> Vec<Span> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        let start = a[i].0.max(b[j].0);
        let end = a[i].1.min(b[j].1);
        if start < end {
            out.push((start, end));
        }
        // Advance whichever span ends first.
        if a[i].1 <= b[j].1 {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}
