//! Dispute engine orchestration
//!
//! `DisputeEngine` coordinates the transaction and dispute stores and
//! enforces the business rules:
//! - every operation is scoped to the calling account; other accounts'
//!   records are reported as not found
//! - a transaction may acquire at most one dispute, ever
//! - filing is all-or-nothing: the dispute record and the transaction's
//!   dispute link are written while holding the transaction's entry lock,
//!   so a dispute never exists without its transaction being linked
//! - status transitions go through the lifecycle table and append exactly
//!   one history event each
//!
//! All methods take `&self`; the engine is safe to share behind an `Arc`.

use crate::core::aggregator::{summarize_disputes, summarize_transactions};
use crate::core::dispute_store::DisputeStore;
use crate::core::lifecycle::validate_transition;
use crate::core::transaction_store::TransactionStore;
use crate::query::filter::{DisputeQuery, TransactionQuery};
use crate::query::pagination::{page_bounds, paginate, PageMetadata};
use crate::types::dispute::{
    Dispute, DisputeEvent, DisputeId, DisputeReason, DisputeStatus, EventId, TransactionSnapshot,
};
use crate::types::error::DisputeError;
use crate::types::summary::{DisputeSummary, TransactionSummary};
use crate::types::transaction::{
    AccountId, DisputeRef, StoredTransaction, Transaction, TransactionDetail, TransactionRecord,
    TransactionStatus,
};
use chrono::Utc;
use log::{debug, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// One page of transactions plus its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub page: PageMetadata,
}

/// One page of disputes plus its metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputePage {
    pub items: Vec<Dispute>,
    pub page: PageMetadata,
}

/// Orchestrates transaction browsing and the dispute lifecycle
#[derive(Debug, Default)]
pub struct DisputeEngine {
    transactions: TransactionStore,
    disputes: DisputeStore,
    dispute_seq: AtomicU64,
    event_seq: AtomicU64,
}

impl DisputeEngine {
    /// Create a new engine with empty stores
    pub fn new() -> Self {
        DisputeEngine {
            transactions: TransactionStore::new(),
            disputes: DisputeStore::new(),
            dispute_seq: AtomicU64::new(0),
            event_seq: AtomicU64::new(0),
        }
    }

    fn next_dispute_id(&self) -> DisputeId {
        format!("dsp-{:06}", self.dispute_seq.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn next_event_id(&self) -> EventId {
        format!("evt-{:06}", self.event_seq.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Ingest a transaction from the external transaction source
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` for a repeated id, or a validation
    /// error if the record claims a `DISPUTED` status (disputed-ness is
    /// derived from the linked dispute, never seeded).
    pub fn add_transaction(&self, record: TransactionRecord) -> Result<(), DisputeError> {
        if record.status == TransactionStatus::Disputed {
            return Err(DisputeError::invalid_filter_value("status", "DISPUTED"));
        }
        self.transactions
            .insert(StoredTransaction::from_record(record, Utc::now()))
    }

    /// Whether the transaction's linked dispute (if any) is non-terminal
    fn dispute_is_open(&self, stored: &StoredTransaction) -> bool {
        stored
            .dispute
            .as_deref()
            .and_then(|id| self.disputes.get(id))
            .map(|d| !d.status.is_terminal())
            .unwrap_or(false)
    }

    /// Materialized views of every transaction the account owns
    fn account_views(&self, account: &str) -> Vec<Transaction> {
        self.transactions
            .for_account(account)
            .iter()
            .map(|stored| stored.view(self.dispute_is_open(stored)))
            .collect()
    }

    /// List the caller's transactions with filtering, sorting, pagination
    ///
    /// A page number beyond the last page yields an empty item list with
    /// metadata for the requested page, not an error.
    pub fn list_transactions(
        &self,
        account: &str,
        query: &TransactionQuery,
    ) -> Result<TransactionPage, DisputeError> {
        let normalized = query.normalize()?;
        debug!("listing transactions for {account}: {normalized:?}");

        let mut matching: Vec<Transaction> = self
            .account_views(account)
            .into_iter()
            .filter(|tx| normalized.matches(tx))
            .collect();
        normalized.sort(&mut matching);

        let page = paginate(matching.len() as u64, normalized.page, normalized.page_size);
        let bounds = page_bounds(matching.len(), normalized.page, normalized.page_size);

        Ok(TransactionPage {
            items: matching[bounds].to_vec(),
            page,
        })
    }

    /// Fetch one transaction with its dispute reference, if any
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` when the id does not resolve or
    /// resolves to another account's record.
    pub fn get_transaction(
        &self,
        account: &str,
        transaction_id: &str,
    ) -> Result<TransactionDetail, DisputeError> {
        let stored = self
            .transactions
            .get(transaction_id)
            .filter(|tx| tx.account == account)
            .ok_or_else(|| DisputeError::transaction_not_found(transaction_id))?;

        let dispute = stored
            .dispute
            .as_deref()
            .and_then(|id| self.disputes.get(id))
            .map(|d| DisputeRef {
                id: d.id,
                reason: d.reason,
                status: d.status,
                created_at: d.created_at,
            });

        Ok(TransactionDetail {
            transaction: stored.view(self.dispute_is_open(&stored)),
            dispute,
        })
    }

    /// Summary over the caller's full transaction set (not the current page)
    pub fn transaction_summary(&self, account: &str) -> TransactionSummary {
        summarize_transactions(&self.account_views(account))
    }

    /// List the caller's disputes with filtering, sorting, pagination
    pub fn list_disputes(
        &self,
        account: &str,
        query: &DisputeQuery,
    ) -> Result<DisputePage, DisputeError> {
        let normalized = query.normalize()?;
        debug!("listing disputes for {account}: {normalized:?}");

        let mut matching: Vec<Dispute> = self
            .disputes
            .for_account(account)
            .into_iter()
            .filter(|d| normalized.matches(d))
            .collect();
        normalized.sort(&mut matching);

        let page = paginate(matching.len() as u64, normalized.page, normalized.page_size);
        let bounds = page_bounds(matching.len(), normalized.page, normalized.page_size);

        Ok(DisputePage {
            items: matching[bounds].to_vec(),
            page,
        })
    }

    /// Fetch one dispute (embedded transaction snapshot and full history)
    ///
    /// # Errors
    ///
    /// Returns `DisputeNotFound` when the id does not resolve or resolves to
    /// another account's record.
    pub fn get_dispute(&self, account: &str, dispute_id: &str) -> Result<Dispute, DisputeError> {
        self.disputes
            .get(dispute_id)
            .filter(|d| d.account == account)
            .ok_or_else(|| DisputeError::dispute_not_found(dispute_id))
    }

    /// Summary over the caller's full dispute set
    pub fn dispute_summary(&self, account: &str) -> DisputeSummary {
        summarize_disputes(&self.disputes.for_account(account))
    }

    /// The ordered audit history of a dispute (creation-time ascending)
    pub fn get_history(
        &self,
        account: &str,
        dispute_id: &str,
    ) -> Result<Vec<DisputeEvent>, DisputeError> {
        Ok(self.get_dispute(account, dispute_id)?.history)
    }

    /// File a dispute against one of the caller's transactions
    ///
    /// Creates the dispute in `OPEN` with its first history event, captures
    /// the transaction snapshot, and links the transaction — all while
    /// holding the transaction's entry lock, so concurrent filings on the
    /// same transaction serialize and exactly one wins.
    ///
    /// # Errors
    ///
    /// - `MissingDescription` if the description is empty after trimming
    /// - `TransactionNotFound` if the id does not resolve within the
    ///   caller's records
    /// - `TransactionAlreadyDisputed` if a dispute was ever filed against
    ///   this transaction, including by a concurrent caller that won the race
    pub fn file_dispute(
        &self,
        account: &str,
        transaction_id: &str,
        reason: DisputeReason,
        description: &str,
        actor: Option<&str>,
    ) -> Result<Dispute, DisputeError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DisputeError::MissingDescription);
        }

        // The closure runs under the transaction's entry lock: the
        // dispute-link check, the dispute insert, and the link write are one
        // atomic step with respect to other filings on this transaction.
        self.transactions.update(transaction_id, |tx| {
            if tx.account != account {
                return Err(DisputeError::transaction_not_found(transaction_id));
            }
            if tx.dispute.is_some() {
                warn!(
                    "rejecting dispute on {transaction_id}: already disputed ({})",
                    tx.dispute.as_deref().unwrap_or_default()
                );
                return Err(DisputeError::transaction_already_disputed(transaction_id));
            }

            let now = Utc::now();
            let dispute = Dispute {
                id: self.next_dispute_id(),
                transaction_id: tx.id.clone(),
                account: tx.account.clone(),
                reason,
                description: description.to_string(),
                status: DisputeStatus::Open,
                created_at: now,
                updated_at: now,
                resolved_at: None,
                resolution_notes: None,
                transaction: TransactionSnapshot {
                    id: tx.id.clone(),
                    amount: tx.amount,
                    merchant: tx.merchant.clone(),
                    category: tx.category,
                    date: tx.date,
                },
                history: vec![DisputeEvent {
                    id: self.next_event_id(),
                    status: DisputeStatus::Open,
                    notes: None,
                    created_at: now,
                    created_by: actor.map(|a| a.to_string()),
                }],
            };

            self.disputes.insert(dispute.clone())?;
            tx.dispute = Some(dispute.id.clone());
            Ok(dispute)
        })
    }

    /// Move a dispute to a new status
    ///
    /// On success the status and `updated_at` change, `resolved_at` and
    /// `resolution_notes` are set when entering a `RESOLVED_*` state, and one
    /// history event is appended. On failure the dispute is left unchanged.
    ///
    /// # Errors
    ///
    /// - `DisputeNotFound` if the id does not resolve within the caller's
    ///   records
    /// - `InvalidTransition` (with current and attempted status) if the move
    ///   is not in the lifecycle table
    pub fn transition(
        &self,
        account: &str,
        dispute_id: &str,
        target: DisputeStatus,
        notes: Option<&str>,
        actor: Option<&str>,
    ) -> Result<Dispute, DisputeError> {
        self.disputes.update(dispute_id, |dispute| {
            if dispute.account != account {
                return Err(DisputeError::dispute_not_found(dispute_id));
            }
            validate_transition(dispute.status, target).inspect_err(|_| {
                warn!(
                    "rejecting transition on {dispute_id}: {} -> {target}",
                    dispute.status
                );
            })?;

            let now = Utc::now();
            dispute.status = target;
            dispute.updated_at = now;
            if target.is_resolution() {
                dispute.resolved_at = Some(now);
                dispute.resolution_notes = notes.map(|n| n.to_string());
            }
            dispute.history.push(DisputeEvent {
                id: self.next_event_id(),
                status: target,
                notes: notes.map(|n| n.to_string()),
                created_at: now,
                created_by: actor.map(|a| a.to_string()),
            });

            Ok(dispute.clone())
        })
    }

    /// Distinct account ids present in the transaction store, sorted
    pub fn accounts(&self) -> Vec<AccountId> {
        self.transactions.accounts()
    }
}
