//! Page windows over processed records.

use std::ops::Range;

use crate::model::Record;

/// Current page position for a collection.
///
/// Pages are 1-indexed. Every navigation clamps into `[1, total_pages]`, and
/// there is always at least one page, even for an empty collection.
///
/// # Example
///
/// ```
/// use tatua_lib::table::Pagination;
///
/// let mut pagination = Pagination::new(2);
/// assert_eq!(pagination.total_pages(5), 3);
///
/// pagination.last(5);
/// assert_eq!(pagination.range(5), 4..5);
///
/// pagination.next(5);
/// assert_eq!(pagination.current(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: usize,
    per_page: usize,
}

impl Pagination {
    /// Creates a pagination on page 1. A page size of 0 is read as 1.
    pub fn new(per_page: usize) -> Self {
        Self {
            current: 1,
            per_page: per_page.max(1),
        }
    }

    /// Returns the current 1-indexed page.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Returns the page size.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Changes the page size and returns to page 1.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.current = 1;
    }

    /// Returns the number of pages for `total` records, at least 1.
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.per_page).max(1)
    }

    /// Returns the index window of the current page.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = ((self.current - 1) * self.per_page).min(total);
        let end = (self.current * self.per_page).min(total);
        start..end
    }

    /// Returns the current page's slice of `records`.
    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        &records[self.range(records.len())]
    }

    pub fn first(&mut self) {
        self.current = 1;
    }

    pub fn prev(&mut self, total: usize) {
        self.goto(self.current.saturating_sub(1), total);
    }

    pub fn next(&mut self, total: usize) {
        self.goto(self.current + 1, total);
    }

    pub fn last(&mut self, total: usize) {
        self.current = self.total_pages(total);
    }

    /// Moves to a page, clamped into range.
    pub fn goto(&mut self, page: usize, total: usize) {
        self.current = page.clamp(1, self.total_pages(total));
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Pulls the current page back into range after the collection shrank.
    pub fn clamp(&mut self, total: usize) {
        self.goto(self.current, total);
    }

    /// Returns `true` if there is a page before the current one.
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    /// Returns `true` if there is a page after the current one.
    pub fn has_next(&self, total: usize) -> bool {
        self.current < self.total_pages(total)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(5)
    }
}

/// One page of processed records with its position.
#[derive(Debug, Clone)]
pub struct Page {
    records: Vec<Record>,
    number: usize,
    total_pages: usize,
    total_count: usize,
}

impl Page {
    /// Cuts the current page out of `records`.
    pub fn from_records(records: &[Record], pagination: &Pagination) -> Self {
        Self {
            records: pagination.slice(records).to_vec(),
            number: pagination.current(),
            total_pages: pagination.total_pages(records.len()),
            total_count: records.len(),
        }
    }

    /// Wraps a whole collection as a single page.
    pub fn whole(records: &[Record]) -> Self {
        Self {
            records: records.to_vec(),
            number: 1,
            total_pages: 1,
            total_count: records.len(),
        }
    }

    /// Returns the records on this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Returns the 1-indexed page number.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Returns the size of the whole processed collection.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records on this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if pages follow this one.
    pub fn has_more(&self) -> bool {
        self.number < self.total_pages
    }
}
