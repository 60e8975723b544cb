pub const PAGE_SIZE: usize = 10;

/// Returns the `[start, end)` window of page `page` over `total` items.
///
/// Pages past the end yield an empty window at `total`; negative pages are
/// treated as page 0.
pub fn paginate(page: i64, page_size: usize, total: usize) -> (usize, usize) {
    let page = usize::try_from(page).unwrap_or(0);
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    (start, end)
}
