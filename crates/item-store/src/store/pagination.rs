//! Page arithmetic over an in-memory list. Pages are 1-based.

use std::ops::Range;

/// Number of pages; an empty list still has one (empty) page
pub fn page_count(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    len.div_ceil(page_size).max(1)
}

/// Pull a requested page into `[1, page_count]`
pub fn clamp_page(page: usize, len: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(len, page_size))
}

/// Index range of the rows shown on `page`
pub fn page_bounds(page: usize, len: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    start..end
}
