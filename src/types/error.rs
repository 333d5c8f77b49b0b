//! Error types for the dispute engine
//!
//! All errors from the core are typed and scoped to the single operation that
//! raised them; nothing here is fatal to the process.
//!
//! # Error Categories
//!
//! - **Validation errors**: malformed or out-of-range query/input values,
//!   surfaced with the offending field
//! - **Not-found errors**: an identifier does not resolve, or resolves to
//!   another account's record (treated identically for confidentiality)
//! - **Business-rule conflicts**: a second dispute on the same transaction,
//!   an illegal lifecycle transition, a duplicate transaction id on ingest
//! - **Race losses**: a mutation lost the serialization race (safe to retry)
//! - **File I/O and CSV errors**: ingestion-layer failures

use crate::types::dispute::DisputeStatus;
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the dispute engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DisputeError {
    /// Page number below 1 was requested
    #[error("Invalid page number {page}: pages start at 1")]
    InvalidPage {
        /// The rejected page number
        page: i64,
    },

    /// Page size outside the accepted range
    #[error("Invalid page size {size}: must be between 1 and {max}")]
    InvalidPageSize {
        /// The rejected page size
        size: i64,
        /// Maximum accepted page size
        max: u32,
    },

    /// A filter value is not a member of its closed enum set
    ///
    /// Unrecognized filter values are rejected rather than silently ignored,
    /// so a typo never masquerades as an empty result set.
    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidFilterValue {
        /// Name of the query parameter
        field: String,
        /// The rejected value
        value: String,
    },

    /// Date-range filter with start after end
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Range start
        start: NaiveDate,
        /// Range end
        end: NaiveDate,
    },

    /// A date parameter could not be parsed as YYYY-MM-DD
    #[error("Invalid date '{value}' for parameter '{field}': expected YYYY-MM-DD")]
    InvalidDate {
        /// Name of the query parameter
        field: String,
        /// The rejected value
        value: String,
    },

    /// Dispute filed without a description
    #[error("Dispute description must not be empty")]
    MissingDescription,

    /// Transaction id does not resolve within the caller's records
    #[error("Transaction {id} not found")]
    TransactionNotFound {
        /// The unresolved transaction id
        id: String,
    },

    /// Dispute id does not resolve within the caller's records
    #[error("Dispute {id} not found")]
    DisputeNotFound {
        /// The unresolved dispute id
        id: String,
    },

    /// The transaction already has a dispute filed against it
    ///
    /// A transaction may have at most one dispute ever; this is also the
    /// outcome observed by the loser of a concurrent filing race.
    #[error("Transaction {id} already has a dispute")]
    TransactionAlreadyDisputed {
        /// The contested transaction id
        id: String,
    },

    /// Requested lifecycle move is not in the legal transition table
    ///
    /// The dispute and its history are left unchanged.
    #[error("Invalid dispute transition from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: DisputeStatus,
        /// Attempted target status
        to: DisputeStatus,
    },

    /// Duplicate transaction id on ingest
    #[error("Duplicate transaction id {id}")]
    DuplicateTransaction {
        /// The duplicated transaction id
        id: String,
    },

    /// Lost a race to serialize a mutation; safe to retry once
    #[error("Concurrent update conflict on {entity} {id}")]
    ConflictLost {
        /// Kind of entity ("transaction" or "dispute")
        entity: String,
        /// Identifier of the contested entity
        id: String,
    },

    /// Input file not found
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error while reading or writing
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing or conversion error
    ///
    /// Recoverable: the malformed record is skipped and processing continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl DisputeError {
    /// Create an InvalidFilterValue error
    pub fn invalid_filter_value(field: &str, value: &str) -> Self {
        DisputeError::InvalidFilterValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an InvalidDate error
    pub fn invalid_date(field: &str, value: &str) -> Self {
        DisputeError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a TransactionNotFound error
    pub fn transaction_not_found(id: &str) -> Self {
        DisputeError::TransactionNotFound { id: id.to_string() }
    }

    /// Create a DisputeNotFound error
    pub fn dispute_not_found(id: &str) -> Self {
        DisputeError::DisputeNotFound { id: id.to_string() }
    }

    /// Create a TransactionAlreadyDisputed error
    pub fn transaction_already_disputed(id: &str) -> Self {
        DisputeError::TransactionAlreadyDisputed { id: id.to_string() }
    }

    /// Create an InvalidTransition error
    pub fn invalid_transition(from: DisputeStatus, to: DisputeStatus) -> Self {
        DisputeError::InvalidTransition { from, to }
    }

    /// Create a DuplicateTransaction error
    pub fn duplicate_transaction(id: &str) -> Self {
        DisputeError::DuplicateTransaction { id: id.to_string() }
    }

    /// Create a ConflictLost error
    pub fn conflict_lost(entity: &str, id: &str) -> Self {
        DisputeError::ConflictLost {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// Create a Parse error
    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        DisputeError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether this error reports malformed caller input (recoverable)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DisputeError::InvalidPage { .. }
                | DisputeError::InvalidPageSize { .. }
                | DisputeError::InvalidFilterValue { .. }
                | DisputeError::InvalidDateRange { .. }
                | DisputeError::InvalidDate { .. }
                | DisputeError::MissingDescription
        )
    }
}

// Conversion from io::Error to DisputeError
impl From<std::io::Error> for DisputeError {
    fn from(error: std::io::Error) -> Self {
        DisputeError::Io {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to DisputeError
impl From<csv::Error> for DisputeError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        DisputeError::Parse {
            line,
            message: error.to_string(),
        }
    }
}
