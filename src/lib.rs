//! Dispute Engine Library
//! # Overview
//!
//! This library lets account holders browse their transactions and work
//! disputes against them: filtered, sorted, paginated listings; a dispute
//! lifecycle with an append-only audit history; and summary aggregation.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (transactions, disputes, summaries, errors)
//! - [`query`] - Query normalization, filtering, sorting, and pagination
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Orchestration and account scoping
//!   - [`core::transaction_store`] / [`core::dispute_store`] - Concurrent storage
//!   - [`core::lifecycle`] - The dispute state machine
//!   - [`core::aggregator`] - Summary computation
//! - [`io`] - CSV ingest and report output
//! - [`cli`] - CLI argument parsing and the processing pipeline
//!
//! # Dispute Lifecycle
//!
//! A dispute starts `OPEN` and moves through review:
//!
//! - **OPEN** → UNDER_REVIEW
//! - **UNDER_REVIEW** → PENDING_INFO, RESOLVED_APPROVED, or RESOLVED_DENIED
//! - **PENDING_INFO** → UNDER_REVIEW (the cycle may repeat)
//! - **RESOLVED_APPROVED / RESOLVED_DENIED** → CLOSED
//! - **CLOSED** is terminal
//!
//! While its dispute is non-terminal a transaction reads as `DISPUTED`;
//! afterwards it reverts to its posted status, but it can never be disputed
//! a second time.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod query;
pub mod types;

pub use crate::core::{DisputeEngine, DisputePage, TransactionPage};
pub use crate::io::{write_disputes_csv, write_transactions_csv, DisputeAction};
pub use crate::query::{DisputeQuery, PageMetadata, TransactionQuery};
pub use crate::types::{
    AccountId, Dispute, DisputeError, DisputeEvent, DisputeId, DisputeReason, DisputeStatus,
    Transaction, TransactionCategory, TransactionDetail, TransactionId, TransactionRecord,
    TransactionStatus,
};
