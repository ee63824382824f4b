//! Complaint lifecycle rules: the status transition table and the
//! `resolved_at` invariant.

use time::OffsetDateTime;

use crate::domain::types::ComplaintStatus;

/// Explicit transition table for complaint statuses.
///
/// Every pair is enumerated so the legality decision lives in one place.
/// All transitions are currently legal, including re-opening a resolved
/// complaint; tightening the lifecycle later means flipping entries here.
pub fn transition_allowed(from: ComplaintStatus, to: ComplaintStatus) -> bool {
    use ComplaintStatus::{InProgress, Pending, Resolved};
    match (from, to) {
        (Pending, Pending) => true,
        (Pending, InProgress) => true,
        (Pending, Resolved) => true,
        (InProgress, Pending) => true,
        (InProgress, InProgress) => true,
        (InProgress, Resolved) => true,
        (Resolved, Pending) => true,
        (Resolved, InProgress) => true,
        (Resolved, Resolved) => true,
    }
}

/// The timestamp that keeps `resolved_at IS NOT NULL <=> status = Resolved`
/// true after a status change.
pub fn resolution_timestamp(
    status: ComplaintStatus,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    match status {
        ComplaintStatus::Resolved => Some(now),
        ComplaintStatus::Pending | ComplaintStatus::InProgress => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ComplaintStatus; 3] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
    ];

    #[test]
    fn every_transition_is_currently_legal() {
        for from in ALL {
            for to in ALL {
                assert!(transition_allowed(from, to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn resolution_timestamp_set_only_for_resolved() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(resolution_timestamp(ComplaintStatus::Resolved, now), Some(now));
        assert_eq!(resolution_timestamp(ComplaintStatus::Pending, now), None);
        assert_eq!(resolution_timestamp(ComplaintStatus::InProgress, now), None);
    }
}
