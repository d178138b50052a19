//! Issue status state machine.
//!
//! The transition table is plain data; a transition is legal iff the
//! requested status is in the source status's destination set. Nothing in
//! the table leads to `archived`, and both `closed` and `archived` are
//! terminal.

use crate::error::{DevTrackError, Result};
use crate::model::Status;

/// Source status and the statuses it may move to.
pub const TRANSITIONS: [(Status, &[Status]); 4] = [
    (Status::Open, &[Status::InProgress]),
    (Status::InProgress, &[Status::Closed]),
    (Status::Closed, &[]),
    (Status::Archived, &[]),
];

/// Destinations reachable from `from` in one step.
#[must_use]
pub fn allowed_transitions(from: Status) -> &'static [Status] {
    for (source, targets) in TRANSITIONS {
        if source == from {
            return targets;
        }
    }
    &[]
}

#[must_use]
pub fn can_transition(from: Status, to: Status) -> bool {
    allowed_transitions(from).contains(&to)
}

#[must_use]
pub fn is_terminal(status: Status) -> bool {
    allowed_transitions(status).is_empty()
}

/// Check a transition against the table.
///
/// # Errors
///
/// Returns `InvalidTransition` when `to` is not reachable from `from`,
/// including `from == to`.
pub fn check_transition(from: Status, to: Status) -> Result<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(DevTrackError::InvalidTransition { from, to })
    }
}
