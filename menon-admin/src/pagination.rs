//! Pagination utilities for menon-admin
//!
//! Offers are browsed 12 rows per page.

/// Page size of the offers table
pub const OFFERS_PAGE_SIZE: usize = 12;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages (at least 1, even when empty)
    pub total_pages: usize,
    /// Index of the first row on the current page
    pub offset: usize,
}

impl Pagination {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]
///
/// # Examples
/// ```
/// use menon_admin::pagination::calculate_pagination;
///
/// // 30 results at 12 per page = 3 pages (12 + 12 + 6)
/// let p = calculate_pagination(30, 2, 12);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 12);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(30, 99, 12);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 24);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: i64, page_size: usize) -> Pagination {
    let page_size = page_size.max(1);
    let total_pages = total_results.div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages as i64) as usize;
    let offset = (page - 1) * page_size;

    Pagination {
        page,
        total_pages,
        offset,
    }
}
