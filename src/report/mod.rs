//! Multi-month sales report pipeline.
//!
//! Range planning -> concurrent per-month fetch -> merge by reseller name ->
//! filter/aggregate view. Mutations re-enter at the top through
//! [`ReportBoard`].

mod fetcher;
mod merge;
mod pagination;
mod planner;
mod reconcile;
mod source;
mod view;

pub use crate::api::MonthBucket;
pub use fetcher::{fetch_buckets, BucketFetch};
pub use merge::merge_reports;
pub use pagination::{PageState, PageStates, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use planner::{plan_month_buckets, plan_range};
pub use reconcile::{RefreshOutcome, RefreshSummary, ReportBoard};
pub use source::ReportSource;
pub use view::{
    build_view, compare_names, name_matches, ReportFilter, ReportView, ResellerView, SaleRow,
};
