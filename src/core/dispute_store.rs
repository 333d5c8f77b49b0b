//! Thread-safe dispute storage
//!
//! Same shape as the transaction store: a `DashMap` keyed by dispute id,
//! clone-out reads, and a closure-based `update` that serializes writers on
//! the same dispute. The history vector inside each dispute is append-only;
//! nothing in this store ever truncates or rewrites it.

use crate::types::dispute::{Dispute, DisputeId};
use crate::types::error::DisputeError;
use dashmap::DashMap;

/// Concurrent store of disputes keyed by dispute id
#[derive(Debug, Default)]
pub struct DisputeStore {
    disputes: DashMap<DisputeId, Dispute>,
}

impl DisputeStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            disputes: DashMap::new(),
        }
    }

    /// Insert a newly created dispute
    ///
    /// # Errors
    ///
    /// Returns `ConflictLost` if a dispute with this id is already present.
    /// The engine's generated ids never collide, so hitting this means two
    /// callers raced the same hand-picked id; retrying once resolves it.
    pub fn insert(&self, dispute: Dispute) -> Result<(), DisputeError> {
        match self.disputes.entry(dispute.id.clone()) {
            dashmap::Entry::Occupied(entry) => {
                Err(DisputeError::conflict_lost("dispute", entry.key()))
            }
            dashmap::Entry::Vacant(entry) => {
                entry.insert(dispute);
                Ok(())
            }
        }
    }

    /// Get a dispute by id (clone-out, lock released immediately)
    pub fn get(&self, id: &str) -> Option<Dispute> {
        self.disputes.get(id).map(|entry| entry.value().clone())
    }

    /// Update a dispute with a closure while holding its entry lock
    ///
    /// Concurrent transitions on the same dispute are serialized here; the
    /// closure must not mutate until all its checks pass, so a failed
    /// transition leaves the dispute unchanged.
    ///
    /// # Errors
    ///
    /// Returns `DisputeNotFound` if the id does not resolve, otherwise
    /// whatever the closure returns.
    pub fn update<F, T>(&self, id: &str, f: F) -> Result<T, DisputeError>
    where
        F: FnOnce(&mut Dispute) -> Result<T, DisputeError>,
    {
        match self.disputes.get_mut(id) {
            Some(mut entry) => f(entry.value_mut()),
            None => Err(DisputeError::dispute_not_found(id)),
        }
    }

    /// All disputes owned by one account
    pub fn for_account(&self, account: &str) -> Vec<Dispute> {
        self.disputes
            .iter()
            .filter(|entry| entry.value().account == account)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of stored disputes
    pub fn len(&self) -> usize {
        self.disputes.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.disputes.is_empty()
    }
}
