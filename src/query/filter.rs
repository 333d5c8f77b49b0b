//! Query model: raw list parameters and their normalized form
//!
//! Raw queries arrive with every field optional and stringly typed, the way
//! a transport layer hands them over. `normalize` applies defaults, validates
//! enum filters against their closed sets, checks date ranges, and resolves
//! the sort — producing a query the engine can apply without further
//! validation. Rules:
//!
//! - page defaults to 1, page size to [`DEFAULT_PAGE_SIZE`] (ceiling
//!   [`MAX_PAGE_SIZE`]); out-of-range values are rejected
//! - an absent or empty filter value means "no constraint", never
//!   "match empty string"
//! - unrecognized enum filter values are rejected with `InvalidFilterValue`,
//!   not silently ignored
//! - unknown sort fields fall back to the documented default instead of
//!   erroring, so stale client links keep working

use crate::types::dispute::{Dispute, DisputeReason, DisputeStatus};
use crate::types::error::DisputeError;
use crate::types::transaction::{
    Transaction, TransactionCategory, TransactionStatus,
};
use chrono::NaiveDate;
use log::debug;
use serde::Deserialize;
use std::cmp::Ordering;

/// Page size applied when the caller does not supply one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest accepted page size; bounds response size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Allow-listed sort fields for transaction listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSortField {
    Date,
    Amount,
    Merchant,
    CreatedAt,
}

/// Allow-listed sort fields for dispute listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeSortField {
    CreatedAt,
    UpdatedAt,
}

/// Raw transaction list parameters as supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionQuery {
    /// Page number, 1-based
    pub page: Option<i64>,

    /// Items per page
    pub limit: Option<i64>,

    /// Category filter (member of the closed set)
    pub category: Option<String>,

    /// Status filter (member of the closed set)
    pub status: Option<String>,

    /// Free-text search, matched case-insensitively against the merchant
    pub search: Option<String>,

    /// Inclusive range start, YYYY-MM-DD
    pub start_date: Option<String>,

    /// Inclusive range end, YYYY-MM-DD
    pub end_date: Option<String>,

    /// Sort field; unknown values fall back to `date`
    pub sort_by: Option<String>,

    /// Sort direction, `asc` or `desc` (default `desc`)
    pub sort_order: Option<String>,
}

/// Raw dispute list parameters as supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisputeQuery {
    /// Page number, 1-based
    pub page: Option<i64>,

    /// Items per page
    pub limit: Option<i64>,

    /// Status filter (member of the closed set)
    pub status: Option<String>,

    /// Reason filter (member of the closed set)
    pub reason: Option<String>,

    /// Sort field; unknown values fall back to `createdAt`
    pub sort_by: Option<String>,

    /// Sort direction, `asc` or `desc` (default `desc`)
    pub sort_order: Option<String>,
}

/// Validated transaction query, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTransactionQuery {
    pub page: u32,
    pub page_size: u32,
    pub category: Option<TransactionCategory>,
    pub status: Option<TransactionStatus>,
    /// Lowercased, trimmed, guaranteed non-empty
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort: TransactionSortField,
    pub order: SortOrder,
}

/// Validated dispute query, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDisputeQuery {
    pub page: u32,
    pub page_size: u32,
    pub status: Option<DisputeStatus>,
    pub reason: Option<DisputeReason>,
    pub sort: DisputeSortField,
    pub order: SortOrder,
}

/// Validate and default the page number
fn normalize_page(page: Option<i64>) -> Result<u32, DisputeError> {
    match page {
        None => Ok(1),
        Some(p) if p >= 1 && p <= u32::MAX as i64 => Ok(p as u32),
        Some(p) => Err(DisputeError::InvalidPage { page: p }),
    }
}

/// Validate and default the page size
fn normalize_limit(limit: Option<i64>) -> Result<u32, DisputeError> {
    match limit {
        None => Ok(DEFAULT_PAGE_SIZE),
        Some(l) if l >= 1 && l <= MAX_PAGE_SIZE as i64 => Ok(l as u32),
        Some(l) => Err(DisputeError::InvalidPageSize {
            size: l,
            max: MAX_PAGE_SIZE,
        }),
    }
}

/// Treat absent or blank filter values as "no constraint"
fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse an enum-valued filter against its closed set
fn parse_filter<T: std::str::FromStr>(
    field: &str,
    value: &Option<String>,
) -> Result<Option<T>, DisputeError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| DisputeError::invalid_filter_value(field, raw)),
    }
}

/// Parse a YYYY-MM-DD date parameter
fn parse_date(field: &str, value: &Option<String>) -> Result<Option<NaiveDate>, DisputeError> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DisputeError::invalid_date(field, raw)),
    }
}

/// Resolve the sort direction (default descending, newest first)
fn normalize_order(order: &Option<String>) -> SortOrder {
    match non_blank(order) {
        Some(raw) if raw.eq_ignore_ascii_case("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    }
}

impl TransactionQuery {
    /// Normalize raw parameters into a validated query
    ///
    /// # Errors
    ///
    /// Returns a validation error if the page or page size is out of range,
    /// an enum filter value is not in its closed set, a date does not parse,
    /// or the date range is inverted.
    pub fn normalize(&self) -> Result<NormalizedTransactionQuery, DisputeError> {
        let page = normalize_page(self.page)?;
        let page_size = normalize_limit(self.limit)?;
        let category = parse_filter::<TransactionCategory>("category", &self.category)?;
        let status = parse_filter::<TransactionStatus>("status", &self.status)?;
        let search = non_blank(&self.search).map(|s| s.to_lowercase());
        let start_date = parse_date("startDate", &self.start_date)?;
        let end_date = parse_date("endDate", &self.end_date)?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(DisputeError::InvalidDateRange { start, end });
            }
        }

        // Unknown sort fields fall back to the default so old links keep working
        let sort = match non_blank(&self.sort_by) {
            None => TransactionSortField::Date,
            Some(raw) if raw.eq_ignore_ascii_case("date") => TransactionSortField::Date,
            Some(raw) if raw.eq_ignore_ascii_case("amount") => TransactionSortField::Amount,
            Some(raw) if raw.eq_ignore_ascii_case("merchant") => TransactionSortField::Merchant,
            Some(raw) if raw.eq_ignore_ascii_case("createdAt") => TransactionSortField::CreatedAt,
            Some(raw) => {
                debug!("unknown transaction sort field '{}', using date", raw);
                TransactionSortField::Date
            }
        };

        Ok(NormalizedTransactionQuery {
            page,
            page_size,
            category,
            status,
            search,
            start_date,
            end_date,
            sort,
            order: normalize_order(&self.sort_order),
        })
    }
}

impl DisputeQuery {
    /// Normalize raw parameters into a validated query
    ///
    /// # Errors
    ///
    /// Returns a validation error if the page or page size is out of range
    /// or an enum filter value is not in its closed set.
    pub fn normalize(&self) -> Result<NormalizedDisputeQuery, DisputeError> {
        let page = normalize_page(self.page)?;
        let page_size = normalize_limit(self.limit)?;
        let status = parse_filter::<DisputeStatus>("status", &self.status)?;
        let reason = parse_filter::<DisputeReason>("reason", &self.reason)?;

        let sort = match non_blank(&self.sort_by) {
            None => DisputeSortField::CreatedAt,
            Some(raw) if raw.eq_ignore_ascii_case("createdAt") => DisputeSortField::CreatedAt,
            Some(raw) if raw.eq_ignore_ascii_case("updatedAt") => DisputeSortField::UpdatedAt,
            Some(raw) => {
                debug!("unknown dispute sort field '{}', using createdAt", raw);
                DisputeSortField::CreatedAt
            }
        };

        Ok(NormalizedDisputeQuery {
            page,
            page_size,
            status,
            reason,
            sort,
            order: normalize_order(&self.sort_order),
        })
    }
}

impl NormalizedTransactionQuery {
    /// Whether a transaction matches every active filter
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(category) = self.category {
            if tx.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if tx.status != status {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !tx.merchant.to_lowercase().contains(search) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if tx.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if tx.date > end {
                return false;
            }
        }
        true
    }

    /// Sort matching transactions in place
    ///
    /// Ties break on the transaction id so listing order is deterministic.
    pub fn sort(&self, items: &mut [Transaction]) {
        items.sort_by(|a, b| {
            let ordering = match self.sort {
                TransactionSortField::Date => a.date.cmp(&b.date),
                TransactionSortField::Amount => a.amount.cmp(&b.amount),
                TransactionSortField::Merchant => {
                    a.merchant.to_lowercase().cmp(&b.merchant.to_lowercase())
                }
                TransactionSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            }
            .then_with(|| a.id.cmp(&b.id));

            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

impl NormalizedDisputeQuery {
    /// Whether a dispute matches every active filter
    pub fn matches(&self, dispute: &Dispute) -> bool {
        if let Some(status) = self.status {
            if dispute.status != status {
                return false;
            }
        }
        if let Some(reason) = self.reason {
            if dispute.reason != reason {
                return false;
            }
        }
        true
    }

    /// Sort matching disputes in place (id tie-break for determinism)
    pub fn sort(&self, items: &mut [Dispute]) {
        items.sort_by(|a, b| {
            let ordering: Ordering = match self.sort {
                DisputeSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                DisputeSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            }
            .then_with(|| a.id.cmp(&b.id));

            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}
