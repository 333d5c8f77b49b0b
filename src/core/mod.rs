//! Core engine: stores, lifecycle rules, aggregation, and orchestration

pub mod aggregator;
pub mod dispute_store;
pub mod engine;
pub mod lifecycle;
pub mod transaction_store;

pub use aggregator::{summarize_disputes, summarize_transactions};
pub use dispute_store::DisputeStore;
pub use engine::{DisputeEngine, DisputePage, TransactionPage};
pub use lifecycle::validate_transition;
pub use transaction_store::TransactionStore;
