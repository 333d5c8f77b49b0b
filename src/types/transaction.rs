//! Transaction-related types for the dispute engine
//!
//! This module defines the transaction record as ingested from the external
//! transaction source, the internally stored form that carries the dispute
//! link, and the externally visible view with the derived status.

use crate::types::dispute::DisputeId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque caller identity
///
/// Every engine operation is scoped to one account; records owned by a
/// different account are indistinguishable from absent ones.
pub type AccountId = String;

/// Transaction identifier, assigned by the external transaction source
pub type TransactionId = String;

/// Spending categories assigned by the transaction source (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionCategory {
    Groceries,
    Restaurants,
    Shopping,
    Entertainment,
    Travel,
    Utilities,
    Healthcare,
    Education,
    Transfer,
    Atm,
    Other,
}

impl TransactionCategory {
    /// All categories, in display order
    pub const ALL: [TransactionCategory; 11] = [
        TransactionCategory::Groceries,
        TransactionCategory::Restaurants,
        TransactionCategory::Shopping,
        TransactionCategory::Entertainment,
        TransactionCategory::Travel,
        TransactionCategory::Utilities,
        TransactionCategory::Healthcare,
        TransactionCategory::Education,
        TransactionCategory::Transfer,
        TransactionCategory::Atm,
        TransactionCategory::Other,
    ];

    /// Wire name of the category (SCREAMING_SNAKE_CASE)
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Groceries => "GROCERIES",
            TransactionCategory::Restaurants => "RESTAURANTS",
            TransactionCategory::Shopping => "SHOPPING",
            TransactionCategory::Entertainment => "ENTERTAINMENT",
            TransactionCategory::Travel => "TRAVEL",
            TransactionCategory::Utilities => "UTILITIES",
            TransactionCategory::Healthcare => "HEALTHCARE",
            TransactionCategory::Education => "EDUCATION",
            TransactionCategory::Transfer => "TRANSFER",
            TransactionCategory::Atm => "ATM",
            TransactionCategory::Other => "OTHER",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionCategory {
    type Err = ();

    /// Parse a category from its wire name (case-insensitive)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionCategory::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or(())
    }
}

/// Transaction status as seen by callers
///
/// `Pending` and `Completed` come from the transaction source. `Disputed` is
/// never stored: it is derived at view time from the linked dispute, so the
/// stored status and the dispute state cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Disputed,
}

impl TransactionStatus {
    /// Wire name of the status (SCREAMING_SNAKE_CASE)
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Disputed => "DISPUTED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TransactionStatus::Pending),
            "COMPLETED" => Ok(TransactionStatus::Completed),
            "DISPUTED" => Ok(TransactionStatus::Disputed),
            _ => Err(()),
        }
    }
}

/// Input transaction record from the external transaction source
///
/// This is the shape handed to [`crate::core::DisputeEngine::add_transaction`]
/// after CSV conversion. The status may only be `Pending` or `Completed`;
/// disputed-ness is derived, never seeded (the CSV converter rejects
/// `DISPUTED` input rows).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Owning account
    pub account: AccountId,

    /// Signed amount with exact decimal precision
    pub amount: Decimal,

    /// Merchant name (non-empty)
    pub merchant: String,

    /// Spending category
    pub category: TransactionCategory,

    /// Optional free-text description
    pub description: Option<String>,

    /// Calendar date the transaction was made
    pub date: NaiveDate,

    /// Posted status (`Pending` or `Completed`)
    pub status: TransactionStatus,
}

/// Internally stored transaction
///
/// Keeps the posted status as ingested plus the dispute link. The effective
/// status shown to callers is computed by [`StoredTransaction::view`]; the
/// store never writes a `Disputed` status field.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTransaction {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Owning account
    pub account: AccountId,

    /// Signed amount with exact decimal precision
    pub amount: Decimal,

    /// Merchant name
    pub merchant: String,

    /// Spending category
    pub category: TransactionCategory,

    /// Optional free-text description
    pub description: Option<String>,

    /// Calendar date the transaction was made
    pub date: NaiveDate,

    /// Status as posted by the transaction source (never `Disputed`)
    pub posted_status: TransactionStatus,

    /// Ingestion timestamp
    pub created_at: DateTime<Utc>,

    /// Reference to the dispute filed against this transaction, if any
    ///
    /// Set at most once, by `file_dispute`, and never cleared: a transaction
    /// may have at most one dispute ever.
    pub dispute: Option<DisputeId>,
}

impl StoredTransaction {
    /// Build a stored transaction from an ingested record
    pub fn from_record(record: TransactionRecord, created_at: DateTime<Utc>) -> Self {
        StoredTransaction {
            id: record.id,
            account: record.account,
            amount: record.amount,
            merchant: record.merchant,
            category: record.category,
            description: record.description,
            date: record.date,
            posted_status: record.status,
            created_at,
            dispute: None,
        }
    }

    /// Materialize the externally visible view
    ///
    /// `dispute_open` tells whether the linked dispute (if any) is currently
    /// in a non-terminal state; the caller resolves that by joining the
    /// dispute store.
    pub fn view(&self, dispute_open: bool) -> Transaction {
        let status = if self.dispute.is_some() && dispute_open {
            TransactionStatus::Disputed
        } else {
            self.posted_status
        };

        Transaction {
            id: self.id.clone(),
            amount: self.amount,
            merchant: self.merchant.clone(),
            category: self.category,
            description: self.description.clone(),
            date: self.date,
            status,
            created_at: self.created_at,
            has_dispute: self.dispute.is_some(),
            dispute_id: self.dispute.clone(),
        }
    }
}

/// Externally visible transaction
///
/// The `status` field is the effective status: `Disputed` while the linked
/// dispute is non-terminal, the posted status otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub amount: Decimal,
    pub merchant: String,
    pub category: TransactionCategory,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub has_dispute: bool,
    pub dispute_id: Option<DisputeId>,
}

/// Short dispute reference embedded in a transaction detail response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeRef {
    pub id: DisputeId,
    pub reason: crate::types::dispute::DisputeReason,
    pub status: crate::types::dispute::DisputeStatus,
    pub created_at: DateTime<Utc>,
}

/// Single transaction plus its dispute reference, if one was ever filed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub dispute: Option<DisputeRef>,
}
