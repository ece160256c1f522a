//! The allowed-transition table.
//!
//! This table is the only source of truth for status changes. There are no
//! implicit reverse edges: `rejected -> pending_automated_review` exists
//! because it is listed, not because the forward edge does.

use robotskills_types::submission::SubmissionStatus;

use SubmissionStatus::*;

/// Targets reachable from `from` in one step.
pub fn allowed_targets(from: SubmissionStatus) -> &'static [SubmissionStatus] {
    match from {
        Draft => &[PendingAutomatedReview, Withdrawn],
        PendingAutomatedReview => &[PendingOemReview, Rejected, Withdrawn],
        PendingOemReview => &[Published, Rejected, Withdrawn],
        Rejected => &[PendingAutomatedReview, Withdrawn],
        Published | Withdrawn => &[],
    }
}

/// Whether `current -> requested` is an edge of the table.
pub fn can_transition(current: SubmissionStatus, requested: SubmissionStatus) -> bool {
    allowed_targets(current).contains(&requested)
}
