//! Summary aggregation
//!
//! Deterministic folds over full record sets (post caller-scoping,
//! pre-pagination). Sums use exact decimal arithmetic; group maps contain
//! only the enum values actually present in the set.

use crate::types::dispute::Dispute;
use crate::types::summary::{DisputeSummary, TransactionSummary};
use crate::types::transaction::{Transaction, TransactionStatus};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Fold a set of transactions into its summary
pub fn summarize_transactions(transactions: &[Transaction]) -> TransactionSummary {
    let mut total_amount = Decimal::ZERO;
    let mut disputed_transactions = 0u64;
    let mut disputed_amount = Decimal::ZERO;
    let mut by_category = BTreeMap::new();
    let mut by_status = BTreeMap::new();

    for tx in transactions {
        total_amount += tx.amount;
        if tx.has_dispute {
            disputed_amount += tx.amount;
        }
        if tx.status == TransactionStatus::Disputed {
            disputed_transactions += 1;
        }
        *by_category.entry(tx.category).or_insert(0u64) += 1;
        *by_status.entry(tx.status).or_insert(0u64) += 1;
    }

    TransactionSummary {
        total_transactions: transactions.len() as u64,
        total_amount,
        disputed_transactions,
        disputed_amount,
        transactions_by_category: by_category,
        transactions_by_status: by_status,
    }
}

/// Fold a set of disputes into its summary
///
/// The disputed amount sums the filing-time transaction snapshots embedded
/// in each dispute, so no store join is needed here.
pub fn summarize_disputes(disputes: &[Dispute]) -> DisputeSummary {
    use crate::types::dispute::DisputeStatus::*;

    let mut open_disputes = 0u64;
    let mut under_review_disputes = 0u64;
    let mut resolved_disputes = 0u64;
    let mut total_disputed_amount = Decimal::ZERO;
    let mut by_reason = BTreeMap::new();
    let mut by_status = BTreeMap::new();

    for dispute in disputes {
        match dispute.status {
            Open => open_disputes += 1,
            UnderReview | PendingInfo => under_review_disputes += 1,
            ResolvedApproved | ResolvedDenied | Closed => resolved_disputes += 1,
        }
        total_disputed_amount += dispute.transaction.amount;
        *by_reason.entry(dispute.reason).or_insert(0u64) += 1;
        *by_status.entry(dispute.status).or_insert(0u64) += 1;
    }

    DisputeSummary {
        total_disputes: disputes.len() as u64,
        open_disputes,
        under_review_disputes,
        resolved_disputes,
        total_disputed_amount,
        disputes_by_reason: by_reason,
        disputes_by_status: by_status,
    }
}
