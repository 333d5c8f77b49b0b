//! Derived summary aggregates
//!
//! Summaries are pure derivations over the caller's full matching record set
//! (never the current page), recomputed on demand. Group maps contain only
//! the enum values actually present; `BTreeMap` keeps report output in a
//! stable order.

use crate::types::dispute::{DisputeReason, DisputeStatus};
use crate::types::transaction::{TransactionCategory, TransactionStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate view over a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    /// Number of transactions in the set
    pub total_transactions: u64,

    /// Exact sum of all amounts
    pub total_amount: Decimal,

    /// Number of transactions with effective status `DISPUTED`
    pub disputed_transactions: u64,

    /// Exact sum of amounts of transactions that have a dispute
    pub disputed_amount: Decimal,

    /// Counts grouped by category (absent categories omitted)
    pub transactions_by_category: BTreeMap<TransactionCategory, u64>,

    /// Counts grouped by effective status (absent statuses omitted)
    pub transactions_by_status: BTreeMap<TransactionStatus, u64>,
}

/// Aggregate view over a set of disputes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeSummary {
    /// Number of disputes in the set
    pub total_disputes: u64,

    /// Disputes currently in `OPEN`
    pub open_disputes: u64,

    /// Disputes in `UNDER_REVIEW` or `PENDING_INFO`
    pub under_review_disputes: u64,

    /// Disputes in a terminal state (`RESOLVED_*` or `CLOSED`)
    pub resolved_disputes: u64,

    /// Exact sum of the disputed transaction amounts (filing-time snapshots)
    pub total_disputed_amount: Decimal,

    /// Counts grouped by reason (absent reasons omitted)
    pub disputes_by_reason: BTreeMap<DisputeReason, u64>,

    /// Counts grouped by status (absent statuses omitted)
    pub disputes_by_status: BTreeMap<DisputeStatus, u64>,
}
