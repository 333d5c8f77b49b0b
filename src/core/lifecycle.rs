//! Dispute lifecycle state machine
//!
//! The single place that knows which status moves are legal. Everything else
//! (the engine, the stores) asks this module instead of encoding transition
//! knowledge locally.
//!
//! ```text
//!   OPEN ──> UNDER_REVIEW ──> RESOLVED_APPROVED ──> CLOSED
//!              │    ^    └──> RESOLVED_DENIED  ──> CLOSED
//!              v    │
//!           PENDING_INFO   (review/info cycle is repeatable)
//! ```
//!
//! `CLOSED` is strictly terminal: there is no reopen transition.

use crate::types::dispute::DisputeStatus;
use crate::types::error::DisputeError;

impl DisputeStatus {
    /// Statuses this one may legally transition into
    pub fn allowed_transitions(&self) -> &'static [DisputeStatus] {
        match self {
            DisputeStatus::Open => &[DisputeStatus::UnderReview],
            DisputeStatus::UnderReview => &[
                DisputeStatus::PendingInfo,
                DisputeStatus::ResolvedApproved,
                DisputeStatus::ResolvedDenied,
            ],
            DisputeStatus::PendingInfo => &[DisputeStatus::UnderReview],
            DisputeStatus::ResolvedApproved => &[DisputeStatus::Closed],
            DisputeStatus::ResolvedDenied => &[DisputeStatus::Closed],
            DisputeStatus::Closed => &[],
        }
    }

    /// Whether the move into `target` is in the legal transition table
    pub fn can_transition_to(&self, target: DisputeStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Whether this status ends the dispute's active life
    ///
    /// A transaction's effective status stops being `DISPUTED` once its
    /// dispute reaches a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DisputeStatus::ResolvedApproved
                | DisputeStatus::ResolvedDenied
                | DisputeStatus::Closed
        )
    }

    /// Whether this status represents a resolution outcome
    ///
    /// Entering one of these sets `resolved_at` and `resolution_notes`.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            DisputeStatus::ResolvedApproved | DisputeStatus::ResolvedDenied
        )
    }
}

/// Validate a requested transition against the table
///
/// # Errors
///
/// Returns `InvalidTransition` carrying both the current and the attempted
/// status when the move is not legal.
pub fn validate_transition(
    from: DisputeStatus,
    to: DisputeStatus,
) -> Result<(), DisputeError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(DisputeError::invalid_transition(from, to))
    }
}
