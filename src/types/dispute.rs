//! Dispute-related types
//!
//! Defines the dispute record, its closed reason and status sets, the
//! append-only history event, and the immutable transaction snapshot captured
//! when a dispute is filed.

use crate::types::transaction::{AccountId, TransactionCategory, TransactionId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dispute identifier, generated by the engine (`dsp-N`)
pub type DisputeId = String;

/// History event identifier, generated by the engine (`evt-N`)
pub type EventId = String;

/// Why the account holder is challenging the transaction (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeReason {
    Unauthorized,
    Duplicate,
    IncorrectAmount,
    NotReceived,
    Cancelled,
    Fraudulent,
    Other,
}

impl DisputeReason {
    /// All reasons, in display order
    pub const ALL: [DisputeReason; 7] = [
        DisputeReason::Unauthorized,
        DisputeReason::Duplicate,
        DisputeReason::IncorrectAmount,
        DisputeReason::NotReceived,
        DisputeReason::Cancelled,
        DisputeReason::Fraudulent,
        DisputeReason::Other,
    ];

    /// Wire name of the reason (SCREAMING_SNAKE_CASE)
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeReason::Unauthorized => "UNAUTHORIZED",
            DisputeReason::Duplicate => "DUPLICATE",
            DisputeReason::IncorrectAmount => "INCORRECT_AMOUNT",
            DisputeReason::NotReceived => "NOT_RECEIVED",
            DisputeReason::Cancelled => "CANCELLED",
            DisputeReason::Fraudulent => "FRAUDULENT",
            DisputeReason::Other => "OTHER",
        }
    }
}

impl fmt::Display for DisputeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisputeReason {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisputeReason::ALL
            .iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or(())
    }
}

/// Dispute lifecycle status
///
/// The legal moves between statuses are defined by
/// [`crate::core::lifecycle`]; this type only names the states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    /// Initial state after filing
    Open,

    /// An agent is actively reviewing the dispute
    UnderReview,

    /// Review is paused waiting for more information from the filer
    PendingInfo,

    /// Terminal: resolved in the account holder's favor
    ResolvedApproved,

    /// Terminal: resolved against the account holder
    ResolvedDenied,

    /// Terminal: administratively closed after resolution, one-way
    Closed,
}

impl DisputeStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [DisputeStatus; 6] = [
        DisputeStatus::Open,
        DisputeStatus::UnderReview,
        DisputeStatus::PendingInfo,
        DisputeStatus::ResolvedApproved,
        DisputeStatus::ResolvedDenied,
        DisputeStatus::Closed,
    ];

    /// Wire name of the status (SCREAMING_SNAKE_CASE)
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::Open => "OPEN",
            DisputeStatus::UnderReview => "UNDER_REVIEW",
            DisputeStatus::PendingInfo => "PENDING_INFO",
            DisputeStatus::ResolvedApproved => "RESOLVED_APPROVED",
            DisputeStatus::ResolvedDenied => "RESOLVED_DENIED",
            DisputeStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisputeStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisputeStatus::ALL
            .iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or(())
    }
}

/// Immutable snapshot of the disputed transaction, captured at filing
///
/// Embedded in the dispute so that dispute listings and summaries never need
/// to re-join the transaction store, and so the audit record keeps the
/// amounts as they were when the dispute was raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSnapshot {
    pub id: TransactionId,
    pub amount: Decimal,
    pub merchant: String,
    pub category: TransactionCategory,
    pub date: NaiveDate,
}

/// One entry in a dispute's audit history
///
/// Created exactly once per transition (including the filing itself), never
/// mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeEvent {
    /// Event identifier
    pub id: EventId,

    /// The status the dispute transitioned *into*
    pub status: DisputeStatus,

    /// Optional notes recorded with the transition
    pub notes: Option<String>,

    /// When the transition happened
    pub created_at: DateTime<Utc>,

    /// Who performed the transition, if known
    pub created_by: Option<String>,
}

/// A dispute raised against exactly one transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    /// Dispute identifier
    pub id: DisputeId,

    /// The disputed transaction (immutable after creation)
    pub transaction_id: TransactionId,

    /// Owning account, same as the transaction's
    pub account: AccountId,

    /// Why the dispute was raised
    pub reason: DisputeReason,

    /// Filer-supplied description (non-empty, immutable after filing)
    pub description: String,

    /// Current lifecycle status
    pub status: DisputeStatus,

    /// Filing timestamp
    pub created_at: DateTime<Utc>,

    /// Timestamp of the most recent transition
    pub updated_at: DateTime<Utc>,

    /// Set once, when the dispute enters a `RESOLVED_*` state
    pub resolved_at: Option<DateTime<Utc>>,

    /// Resolution notes, set only on terminal resolution
    pub resolution_notes: Option<String>,

    /// Snapshot of the disputed transaction at filing time
    pub transaction: TransactionSnapshot,

    /// Ordered, append-only audit history (creation-time ascending)
    pub history: Vec<DisputeEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unauthorized("UNAUTHORIZED", DisputeReason::Unauthorized)]
    #[case::incorrect_amount("INCORRECT_AMOUNT", DisputeReason::IncorrectAmount)]
    #[case::lowercase("not_received", DisputeReason::NotReceived)]
    fn test_reason_from_str_valid(#[case] input: &str, #[case] expected: DisputeReason) {
        assert_eq!(input.parse::<DisputeReason>(), Ok(expected));
    }

    #[rstest]
    #[case::typo("UNAUTHORISED")]
    #[case::empty("")]
    fn test_reason_from_str_invalid(#[case] input: &str) {
        assert!(input.parse::<DisputeReason>().is_err());
    }

    #[rstest]
    #[case::open("OPEN", DisputeStatus::Open)]
    #[case::under_review("UNDER_REVIEW", DisputeStatus::UnderReview)]
    #[case::pending_info("PENDING_INFO", DisputeStatus::PendingInfo)]
    #[case::approved("RESOLVED_APPROVED", DisputeStatus::ResolvedApproved)]
    #[case::denied("resolved_denied", DisputeStatus::ResolvedDenied)]
    #[case::closed("CLOSED", DisputeStatus::Closed)]
    fn test_status_from_str_valid(#[case] input: &str, #[case] expected: DisputeStatus) {
        assert_eq!(input.parse::<DisputeStatus>(), Ok(expected));
    }

    #[test]
    fn test_status_from_str_invalid() {
        assert!("REOPENED".parse::<DisputeStatus>().is_err());
    }

    #[test]
    fn test_status_round_trips_through_display() {
        for status in DisputeStatus::ALL {
            assert_eq!(status.as_str().parse::<DisputeStatus>(), Ok(status));
        }
    }
}
