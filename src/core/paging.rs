// LogLens - core/paging.rs
//
// Fixed-size page window over an already filtered and sorted row sequence.
// Core layer: pure index arithmetic, no I/O or UI dependencies.
//
// Pages are 1-based. The current page is re-clamped into
// [1, total_pages] whenever the source size, the page size, or the
// requested page changes.

use crate::core::filter::FilterSortProxy;
use crate::core::model::{Column, Record, SortOrder};
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct PagingProxy {
    page_size: usize,
    current_page: usize,
    enabled: bool,
    source_count: usize,
}

impl PagingProxy {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            enabled: true,
            source_count: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn source_count(&self) -> usize {
        self.source_count
    }

    /// `max(1, ceil(source_count / page_size))`. Always 1 while disabled.
    pub fn total_pages(&self) -> usize {
        if !self.enabled {
            return 1;
        }
        self.source_count.div_ceil(self.page_size).max(1)
    }

    pub fn set_source_count(&mut self, count: usize) {
        self.source_count = count;
        self.clamp();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.clamp();
    }

    /// Request `page`; out-of-range values are clamped.
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page;
        self.clamp();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    /// Disabling paging turns the window into a 1:1 passthrough.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.clamp();
    }

    fn clamp(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    /// Source rows covered by the current window.
    pub fn window(&self) -> Range<usize> {
        if !self.enabled {
            return 0..self.source_count;
        }
        let start = ((self.current_page - 1) * self.page_size).min(self.source_count);
        let end = (start + self.page_size).min(self.source_count);
        start..end
    }

    /// Number of rows in the current window.
    pub fn row_count(&self) -> usize {
        self.window().len()
    }

    /// Source row of window row `row`, or `None` past the window end.
    pub fn map_to_source(&self, row: usize) -> Option<usize> {
        let window = self.window();
        let source = window.start.checked_add(row)?;
        window.contains(&source).then_some(source)
    }

    /// Paging never orders rows itself; the request goes to the sortable
    /// proxy underneath and the window is re-clamped to its new size.
    pub fn sort(
        &mut self,
        source: &mut FilterSortProxy,
        records: &[Record],
        column: Column,
        order: SortOrder,
    ) {
        source.sort(records, column, order);
        self.set_source_count(source.row_count());
    }
}

impl Default for PagingProxy {
    fn default() -> Self {
        Self::new(crate::util::constants::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ten_rows_page_size_four() {
        let mut paging = PagingProxy::new(4);
        paging.set_source_count(10);
        assert_eq!(paging.total_pages(), 3);

        paging.set_page(3);
        assert_eq!(paging.row_count(), 2);
        assert_eq!(paging.window(), 8..10);
        assert_eq!(paging.map_to_source(0), Some(8));
        assert_eq!(paging.map_to_source(1), Some(9));
        assert_eq!(paging.map_to_source(2), None);

        paging.set_page(5);
        assert_eq!(paging.current_page(), 3);
    }

    #[test]
    fn test_empty_source_has_one_page() {
        let mut paging = PagingProxy::new(50);
        paging.set_source_count(0);
        assert_eq!(paging.total_pages(), 1);
        assert_eq!(paging.row_count(), 0);
        paging.set_page(0);
        assert_eq!(paging.current_page(), 1);
    }

    #[test]
    fn test_shrinking_source_clamps_page() {
        let mut paging = PagingProxy::new(10);
        paging.set_source_count(100);
        paging.set_page(10);
        paging.set_source_count(25);
        assert_eq!(paging.current_page(), 3);
        paging.set_page_size(100);
        assert_eq!(paging.current_page(), 1);
    }

    #[test]
    fn test_disabled_paging_is_passthrough() {
        let mut paging = PagingProxy::new(4);
        paging.set_source_count(10);
        paging.set_page(2);
        paging.set_enabled(false);
        assert_eq!(paging.row_count(), 10);
        assert_eq!(paging.map_to_source(9), Some(9));
        assert_eq!(paging.total_pages(), 1);
    }

    #[test]
    fn test_sort_is_forwarded_to_source_proxy() {
        let records: Vec<Record> = ["c", "a", "b"]
            .iter()
            .map(|m| Record {
                timestamp: String::new(),
                level: "INFO".to_string(),
                message: (*m).to_string(),
                app_name: "App".to_string(),
                source_path: PathBuf::from("a.log"),
            })
            .collect();
        let mut proxy = FilterSortProxy::new();
        proxy.invalidate(&records);
        let mut paging = PagingProxy::new(2);
        paging.set_source_count(proxy.row_count());

        paging.sort(&mut proxy, &records, Column::Message, SortOrder::Ascending);
        assert_eq!(proxy.sort_state(), Some((Column::Message, SortOrder::Ascending)));
        let first = paging.map_to_source(0).and_then(|r| proxy.source_row(r));
        assert_eq!(first, Some(1));
    }
}
