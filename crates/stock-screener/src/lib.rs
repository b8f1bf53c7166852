//! Stock Screener
//!
//! Search, threshold filters and stable sorting over the research catalog.
//! Everything here is a pure function of its inputs; callers re-run `view`
//! on every table state change.

pub mod filters;
pub mod screener;
pub mod sort;

pub use filters::{MetricFilters, QUICK_FILTER_THRESHOLD};
pub use screener::{view, view_slice, ViewRequest};
pub use sort::{SortDirection, SortKey, SortSpec};
