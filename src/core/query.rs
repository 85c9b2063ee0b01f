//! The view transform: filter, sort and paginate a collection snapshot
//!
//! Everything here is pure. A [`Snapshot`] (the full ordered id-to-record
//! mapping pushed by the gateway) goes in together with the session's view
//! state, and one bounded [`PageView`] comes out. Calling the transform twice
//! with the same inputs produces the same output; inputs are never mutated.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::RecordId;

/// Full-collection snapshot: record id mapped to record, in creation order
pub type Snapshot<T> = IndexMap<RecordId, T>;

/// Predicate deciding whether a record stays in the view
///
/// Implemented by the per-collection filter structs (e.g. `BookFilters`).
/// An all-empty filter retains everything.
pub trait ViewFilter<T> {
    fn retains(&self, record: &T) -> bool;
}

/// Total order over records for one sortable field plus a direction
///
/// Implemented by the per-collection sort structs (e.g. `BookSort`), which
/// map a closed enum of fields to typed comparators.
pub trait SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Sort direction applied on top of a field comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Apply the direction to a comparator result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One display page: 1-based page number and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageWindow {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self { page: 1, per_page: 5 }
    }
}

impl PageWindow {
    /// Get the page number, ensuring a minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get the page size, clamped to a sane range
    pub fn per_page(&self) -> usize {
        self.per_page.clamp(1, 100)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub per_page: usize,

    /// Total number of records after filtering
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PageMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, per_page: usize, total: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_pages = if total == 0 { 0 } else { total.div_ceil(per_page) };
        let start = (page - 1) * per_page;

        Self {
            page,
            per_page,
            total,
            total_pages,
            has_next: start + per_page < total,
            has_prev: page > 1,
        }
    }
}

/// One page of the filtered, sorted view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

/// Retain the records matching the filter, preserving snapshot order
pub fn filter_records<T, F>(snapshot: &Snapshot<T>, filter: &F) -> Vec<T>
where
    T: Clone,
    F: ViewFilter<T>,
{
    snapshot
        .values()
        .filter(|record| filter.retains(record))
        .cloned()
        .collect()
}

/// Sort records in place by the given key
///
/// The sort is stable: records that compare equal keep their snapshot order.
pub fn sort_records<T, S>(records: &mut [T], sort: &S)
where
    S: SortKey<T>,
{
    records.sort_by(|a, b| sort.compare(a, b));
}

/// The full view transform: filter, sort, then slice one page
///
/// An absent page (start index past the filtered set) yields an empty page,
/// never an error. `meta.total` reflects the filtered result size.
pub fn page_view<T, F, S>(
    snapshot: &Snapshot<T>,
    filter: &F,
    sort: &S,
    window: &PageWindow,
) -> PageView<T>
where
    T: Clone,
    F: ViewFilter<T>,
    S: SortKey<T>,
{
    let page = window.page();
    let per_page = window.per_page();

    if snapshot.is_empty() {
        return PageView {
            items: Vec::new(),
            meta: PageMeta::new(page, per_page, 0),
        };
    }

    let mut records = filter_records(snapshot, filter);
    sort_records(&mut records, sort);

    let total = records.len();
    let start = (page - 1) * per_page;
    let items: Vec<T> = records.into_iter().skip(start).take(per_page).collect();

    PageView {
        items,
        meta: PageMeta::new(page, per_page, total),
    }
}
