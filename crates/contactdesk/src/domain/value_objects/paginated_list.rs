//! PaginatedList - One page of results plus paging metadata

use serde::Serialize;

/// A page of items out of a larger result set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    /// 1-indexed page number
    pub page_index: i64,
    pub total_pages: i64,
    pub total_records: i64,
}

impl<T> PaginatedList<T> {
    pub fn new(items: Vec<T>, total_records: i64, page_index: i64, page_size: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total_records + page_size - 1) / page_size
        } else {
            0
        };

        Self {
            items,
            page_index,
            total_pages,
            total_records,
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page_index < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            total_pages: self.total_pages,
            total_records: self.total_records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PaginatedList::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_previous_page());
        assert!(page.has_next_page());
    }

    #[test]
    fn test_last_page_flags() {
        let page = PaginatedList::new(vec![21, 22], 22, 3, 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_previous_page());
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_empty_result_set() {
        let page: PaginatedList<i32> = PaginatedList::new(vec![], 0, 1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page());
    }
}
