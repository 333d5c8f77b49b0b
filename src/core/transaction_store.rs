//! Thread-safe transaction storage
//!
//! Holds the stored transactions behind a `DashMap` so that readers run
//! concurrently while mutations on the same transaction are serialized by
//! the entry's shard lock. `file_dispute` relies on this: the closure passed
//! to [`TransactionStore::update`] runs while the entry is locked, so two
//! concurrent filings on the same transaction cannot both observe an unset
//! dispute link.

use crate::types::error::DisputeError;
use crate::types::transaction::{AccountId, StoredTransaction, TransactionId};
use dashmap::DashMap;

/// Concurrent store of transactions keyed by transaction id
#[derive(Debug, Default)]
pub struct TransactionStore {
    transactions: DashMap<TransactionId, StoredTransaction>,
}

impl TransactionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
        }
    }

    /// Insert a transaction
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTransaction` if a transaction with the same id is
    /// already present; the existing record is left untouched.
    pub fn insert(&self, transaction: StoredTransaction) -> Result<(), DisputeError> {
        match self.transactions.entry(transaction.id.clone()) {
            dashmap::Entry::Occupied(entry) => {
                Err(DisputeError::duplicate_transaction(entry.key()))
            }
            dashmap::Entry::Vacant(entry) => {
                entry.insert(transaction);
                Ok(())
            }
        }
    }

    /// Get a transaction by id (clone-out, lock released immediately)
    pub fn get(&self, id: &str) -> Option<StoredTransaction> {
        self.transactions.get(id).map(|entry| entry.value().clone())
    }

    /// Update a transaction with a closure while holding its entry lock
    ///
    /// The closure runs with exclusive access to the record; concurrent
    /// writers on the same transaction wait, writers on other transactions
    /// proceed. If the closure errors the record keeps any changes the
    /// closure already made, so closures must mutate only after all checks
    /// pass.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` if the id does not resolve, otherwise
    /// whatever the closure returns.
    pub fn update<F, T>(&self, id: &str, f: F) -> Result<T, DisputeError>
    where
        F: FnOnce(&mut StoredTransaction) -> Result<T, DisputeError>,
    {
        match self.transactions.get_mut(id) {
            Some(mut entry) => f(entry.value_mut()),
            None => Err(DisputeError::transaction_not_found(id)),
        }
    }

    /// All transactions owned by one account
    pub fn for_account(&self, account: &str) -> Vec<StoredTransaction> {
        self.transactions
            .iter()
            .filter(|entry| entry.value().account == account)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Distinct account ids present in the store, sorted
    pub fn accounts(&self) -> Vec<AccountId> {
        let mut accounts: Vec<AccountId> = self
            .transactions
            .iter()
            .map(|entry| entry.value().account.clone())
            .collect();
        accounts.sort();
        accounts.dedup();
        accounts
    }

    /// Number of stored transactions
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::{TransactionCategory, TransactionRecord, TransactionStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn stored(id: &str, account: &str) -> StoredTransaction {
        StoredTransaction::from_record(
            TransactionRecord {
                id: id.to_string(),
                account: account.to_string(),
                amount: Decimal::new(10000, 2),
                merchant: "Acme Stores".to_string(),
                category: TransactionCategory::Shopping,
                description: None,
                date: "2024-03-01".parse().unwrap(),
                status: TransactionStatus::Completed,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let store = TransactionStore::new();
        store.insert(stored("txn-1", "acct-1")).unwrap();

        let retrieved = store.get("txn-1").unwrap();
        assert_eq!(retrieved.id, "txn-1");
        assert_eq!(retrieved.account, "acct-1");
        assert_eq!(retrieved.dispute, None);
    }

    #[test]
    fn test_insert_duplicate_id_rejected() {
        let store = TransactionStore::new();
        store.insert(stored("txn-1", "acct-1")).unwrap();

        let result = store.insert(stored("txn-1", "acct-2"));
        assert_eq!(
            result.unwrap_err(),
            DisputeError::duplicate_transaction("txn-1")
        );
        // First insert wins
        assert_eq!(store.get("txn-1").unwrap().account, "acct-1");
    }

    #[test]
    fn test_get_nonexistent_returns_none() {
        let store = TransactionStore::new();
        assert!(store.get("txn-9").is_none());
    }

    #[test]
    fn test_update_mutates_under_lock() {
        let store = TransactionStore::new();
        store.insert(stored("txn-1", "acct-1")).unwrap();

        store
            .update("txn-1", |tx| {
                tx.dispute = Some("dsp-1".to_string());
                Ok(())
            })
            .unwrap();

        assert_eq!(store.get("txn-1").unwrap().dispute.as_deref(), Some("dsp-1"));
    }

    #[test]
    fn test_update_missing_transaction() {
        let store = TransactionStore::new();
        let result: Result<(), _> = store.update("txn-9", |_| Ok(()));
        assert_eq!(
            result.unwrap_err(),
            DisputeError::transaction_not_found("txn-9")
        );
    }

    #[test]
    fn test_update_error_propagates() {
        let store = TransactionStore::new();
        store.insert(stored("txn-1", "acct-1")).unwrap();

        let result: Result<(), _> = store.update("txn-1", |tx| {
            Err(DisputeError::transaction_already_disputed(&tx.id))
        });
        assert_eq!(
            result.unwrap_err(),
            DisputeError::transaction_already_disputed("txn-1")
        );
    }

    #[test]
    fn test_for_account_scopes_results() {
        let store = TransactionStore::new();
        store.insert(stored("txn-1", "acct-1")).unwrap();
        store.insert(stored("txn-2", "acct-1")).unwrap();
        store.insert(stored("txn-3", "acct-2")).unwrap();

        let mine = store.for_account("acct-1");
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|tx| tx.account == "acct-1"));
        assert!(store.for_account("acct-3").is_empty());
    }

    #[test]
    fn test_accounts_sorted_distinct() {
        let store = TransactionStore::new();
        store.insert(stored("txn-1", "acct-b")).unwrap();
        store.insert(stored("txn-2", "acct-a")).unwrap();
        store.insert(stored("txn-3", "acct-b")).unwrap();

        assert_eq!(store.accounts(), vec!["acct-a", "acct-b"]);
    }
}
