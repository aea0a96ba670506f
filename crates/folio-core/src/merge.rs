//! Chronological merge of per-file record runs
//!
//! Both operands are already sorted, so a full re-sort is never needed:
//! disjoint date ranges reduce to an append or prepend, and overlapping
//! ranges take a single two-pointer pass. O(n+m) worst case.

use tracing::trace;

use crate::models::CanonicalRecord;

/// Merge a file's sorted records into the job's accumulated sorted run
///
/// Tie-break on equal dates: entries already in `existing` stay ahead of
/// `incoming` entries, preserving the job's file arrival order. The
/// prepend shortcut requires strictly older incoming data for the same
/// reason — an equal boundary date must go through the linear pass so
/// the tie-break applies.
pub fn merge_sorted(
    existing: Vec<CanonicalRecord>,
    incoming: Vec<CanonicalRecord>,
) -> Vec<CanonicalRecord> {
    if incoming.is_empty() {
        return existing;
    }
    if existing.is_empty() {
        return incoming;
    }

    // Boundary checks are O(1); both operands are non-empty here
    if incoming[0].date >= existing[existing.len() - 1].date {
        trace!("merge: append fast path");
        let mut merged = existing;
        merged.extend(incoming);
        return merged;
    }

    if incoming[incoming.len() - 1].date < existing[0].date {
        trace!("merge: prepend fast path");
        let mut merged = incoming;
        merged.extend(existing);
        return merged;
    }

    trace!("merge: overlapping ranges, linear pass");
    linear_merge(existing, incoming)
}

/// Classic two-pointer merge of two sorted runs
fn linear_merge(
    existing: Vec<CanonicalRecord>,
    incoming: Vec<CanonicalRecord>,
) -> Vec<CanonicalRecord> {
    let mut merged = Vec::with_capacity(existing.len() + incoming.len());
    let mut left = existing.into_iter().peekable();
    let mut right = incoming.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            // <= keeps existing entries ahead on equal dates
            (Some(l), Some(r)) => l.date <= r.date,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_left {
            merged.extend(left.next());
        } else {
            merged.extend(right.next());
        }
    }

    merged
}
