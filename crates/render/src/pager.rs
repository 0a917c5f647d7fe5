//! Page math for the member list
use std::cmp;

/// Number of members per page
pub const PAGE_SIZE: usize = 12;

/// Read the `page` query value.
///
/// Missing, empty, non numeric, non finite and below 1 values all mean page 1. Fractions are
/// floored, values too large for `usize` saturate.
/// ```
/// use render::pager::parse_page_param;
///
/// assert_eq!(parse_page_param(None), 1);
/// assert_eq!(parse_page_param(Some("3")), 3);
/// assert_eq!(parse_page_param(Some(" 2.9 ")), 2);
/// assert_eq!(parse_page_param(Some("0")), 1);
/// assert_eq!(parse_page_param(Some("-4")), 1);
/// assert_eq!(parse_page_param(Some("abc")), 1);
/// assert_eq!(parse_page_param(Some("Infinity")), 1);
/// assert_eq!(parse_page_param(Some("1e30")), usize::MAX);
/// ```
pub fn parse_page_param(raw: Option<&str>) -> usize {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return 1,
    };
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 1.0 => n.floor() as usize,
        _ => 1,
    }
}

/// A view of `items` split into fixed size pages, numbered from 1
#[derive(Debug, Clone, Copy)]
pub struct Pager<'a, T> {
    items: &'a [T],
    per_page: usize,
}

impl<'a, T> Pager<'a, T> {
    /// Split into pages of [`PAGE_SIZE`]
    pub fn new(items: &'a [T]) -> Self {
        Self::with_page_size(items, PAGE_SIZE)
    }

    /// Split into pages of `per_page`, which must not be 0
    pub fn with_page_size(items: &'a [T], per_page: usize) -> Self {
        assert!(per_page > 0, "Empty pages");
        Self { items, per_page }
    }

    /// Get the number of total pages, 0 if there are no items
    pub fn total_pages(&self) -> usize {
        (self.items.len() + self.per_page - 1) / self.per_page
    }

    /// Clamp a page number into `1..=total_pages`, an empty pager always gives 1
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, cmp::max(1, self.total_pages()))
    }

    /// Get the items of a page, after clamping the page number
    pub fn items(&self, page: usize) -> &'a [T] {
        let start = (self.clamp(page) - 1) * self.per_page;
        let end = cmp::min(start + self.per_page, self.items.len());
        self.items.get(start..end).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_make_three_pages() {
        let items: Vec<usize> = (0..25).collect();
        let pager = Pager::new(&items);
        assert_eq!(pager.total_pages(), 3);
        assert_eq!(pager.items(1), &items[0..12]);
        assert_eq!(pager.items(2), &items[12..24]);
        assert_eq!(pager.items(3), &[24]);
    }

    #[test]
    fn page_sizes_match_remaining_items() {
        for total in [1usize, 11, 12, 13, 24, 25, 100] {
            let items: Vec<usize> = (0..total).collect();
            let pager = Pager::new(&items);
            for page in 1..=pager.total_pages() {
                let expected = cmp::min(PAGE_SIZE, total - (page - 1) * PAGE_SIZE);
                assert_eq!(pager.items(page).len(), expected, "total {} page {}", total, page);
                assert_eq!(pager.items(page)[0], (page - 1) * PAGE_SIZE);
            }
        }
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let items: Vec<usize> = (0..25).collect();
        let pager = Pager::new(&items);
        assert_eq!(pager.clamp(0), 1);
        assert_eq!(pager.clamp(4), 3);
        assert_eq!(pager.clamp(usize::MAX), 3);
        assert_eq!(pager.items(usize::MAX), &[24]);
        assert_eq!(pager.clamp(parse_page_param(Some("-1"))), 1);
    }

    #[test]
    fn empty_pager() {
        let items: Vec<usize> = Vec::new();
        let pager = Pager::new(&items);
        assert_eq!(pager.total_pages(), 0);
        assert_eq!(pager.clamp(5), 1);
        assert!(pager.items(1).is_empty());
    }
}
