/// Slice one page out of an ordered result set
///
/// `page` is 1-based. Returns the page slice and the total page count, which
/// is at least 1 even for an empty set. Pages past the end yield an empty
/// slice.
pub fn paginate<T>(items: &[T], page: usize, limit: usize) -> (&[T], usize) {
    let limit = limit.max(1);
    let total_pages = items.len().div_ceil(limit).max(1);

    let start = page.saturating_sub(1).saturating_mul(limit);
    if start >= items.len() {
        return (&[], total_pages);
    }
    let end = start.saturating_add(limit).min(items.len());

    (&items[start..end], total_pages)
}
