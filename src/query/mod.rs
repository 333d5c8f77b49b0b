//! Query model and pagination
//!
//! - `filter` - raw list parameters, validation, and normalization
//! - `pagination` - pure page metadata arithmetic

pub mod filter;
pub mod pagination;

pub use filter::{
    DisputeQuery, DisputeSortField, NormalizedDisputeQuery, NormalizedTransactionQuery, SortOrder,
    TransactionQuery, TransactionSortField, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use pagination::{page_bounds, paginate, PageMetadata};
