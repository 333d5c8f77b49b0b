//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `transaction`: transaction records, views, and their closed enum sets
//! - `dispute`: disputes, history events, and their closed enum sets
//! - `summary`: derived aggregate types
//! - `error`: error types for the dispute engine

pub mod dispute;
pub mod error;
pub mod summary;
pub mod transaction;

pub use dispute::{
    Dispute, DisputeEvent, DisputeId, DisputeReason, DisputeStatus, EventId, TransactionSnapshot,
};
pub use error::DisputeError;
pub use summary::{DisputeSummary, TransactionSummary};
pub use transaction::{
    AccountId, DisputeRef, StoredTransaction, Transaction, TransactionCategory, TransactionDetail,
    TransactionId, TransactionRecord, TransactionStatus,
};
