use serde::{Deserialize, Serialize};

/// Pagination state.
///
/// `total_pages = ceil(total_items / page_size)`, recomputed whenever the
/// filtered set size changes. `current_page` is 1-based.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(10)
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
            total_pages: 0,
        }
    }

    /// Update totals from the post-filter row count and clamp the current
    /// page back into range (an emptied set keeps page 1).
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.total_pages = total_items.div_ceil(self.page_size);
        self.current_page = self.current_page.min(self.total_pages.max(1));
    }

    /// Index of the first row on the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let mut p = Pagination::new(2);
        p.set_total_items(5);
        assert_eq!(p.total_pages, 3);
        p.set_total_items(4);
        assert_eq!(p.total_pages, 2);
        p.set_total_items(0);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.current_page, 1);
    }

    #[test]
    fn test_current_page_clamped_when_set_shrinks() {
        let mut p = Pagination::new(10);
        p.set_total_items(100);
        p.current_page = 10;
        p.set_total_items(25);
        assert_eq!(p.current_page, 3);
    }

    #[test]
    fn test_offset() {
        let mut p = Pagination::new(25);
        p.set_total_items(100);
        p.current_page = 3;
        assert_eq!(p.offset(), 50);
    }
}
