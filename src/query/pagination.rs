//! Pure pagination arithmetic
//!
//! Converts a page request plus a total count into page metadata and slice
//! bounds. No side effects; safe to call with any page number — a request
//! beyond the last page yields an empty slice with metadata reflecting the
//! requested page, never an error, so list endpoints stay safe to call with
//! a stale page number after the underlying data shrinks.

use serde::Serialize;
use std::ops::Range;

/// Page metadata returned alongside every list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// The requested page (1-based, may exceed `total_pages`)
    pub current_page: u32,

    /// Items per page
    pub page_size: u32,

    /// Total matching items across all pages
    pub total_items: u64,

    /// `ceil(total_items / page_size)`, clamped to 1 when the set is empty
    pub total_pages: u32,

    /// `current_page < total_pages`
    pub has_next_page: bool,

    /// `current_page > 1`
    pub has_previous_page: bool,
}

/// Compute page metadata for a matched count and a normalized page request
///
/// # Arguments
///
/// * `total_items` - Number of items matching the query (pre-pagination)
/// * `page` - Requested page, 1-based (already validated to be >= 1)
/// * `page_size` - Items per page (already validated to be >= 1)
pub fn paginate(total_items: u64, page: u32, page_size: u32) -> PageMetadata {
    let total_pages = if total_items == 0 {
        1
    } else {
        (total_items.div_ceil(page_size as u64)) as u32
    };

    PageMetadata {
        current_page: page,
        page_size,
        total_items,
        total_pages,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    }
}

/// Index range of the requested page within a slice of `total_items` items
///
/// A page past the end produces an empty range at the end of the slice.
pub fn page_bounds(total_items: usize, page: u32, page_size: u32) -> Range<usize> {
    let start = (page as usize - 1).saturating_mul(page_size as usize);
    if start >= total_items {
        return total_items..total_items;
    }
    let end = (start + page_size as usize).min(total_items);
    start..end
}
