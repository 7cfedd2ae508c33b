use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use super::{
    build_view, fetch_buckets, merge_reports, plan_range, MonthBucket, ReportFilter, ReportSource,
    ReportView,
};
use crate::error::ApiError;
use crate::models::{ReportMap, SaleRecord};
use crate::period::{DateRange, TzSpec};
use crate::session::Session;

/// Buckets behind the currently applied data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub buckets: Vec<MonthBucket>,
    /// Months that failed and are shown as empty.
    pub failed: Vec<MonthBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh data was fetched and applied.
    Applied(RefreshSummary),
    /// The new range maps onto the cached months; only the window moved.
    Refiltered,
    /// A later refresh started first; this result was discarded.
    Superseded,
}

impl RefreshOutcome {
    pub fn is_superseded(&self) -> bool {
        matches!(self, RefreshOutcome::Superseded)
    }
}

#[derive(Debug)]
struct Snapshot {
    range: DateRange,
    summary: RefreshSummary,
    merged: ReportMap,
}

/// The most recently dispatched fetch that has not landed yet.
#[derive(Debug)]
struct InFlight {
    generation: u64,
    buckets: Vec<MonthBucket>,
}

#[derive(Debug)]
struct BoardState {
    /// Most recently requested range; refreshes after mutations use it.
    requested: DateRange,
    search: String,
    snapshot: Option<Snapshot>,
    in_flight: Option<InFlight>,
}

impl BoardState {
    /// Whether a range over `buckets` can be served without a new fetch.
    ///
    /// A pending fetch for the same months will land under the new range.
    /// With nothing pending, the snapshot must cover the same months with no
    /// failures.
    fn covers(&self, buckets: &[MonthBucket]) -> bool {
        match (&self.in_flight, &self.snapshot) {
            (Some(pending), _) => pending.buckets == buckets,
            (None, Some(snapshot)) => {
                snapshot.summary.buckets == buckets && snapshot.summary.failed.is_empty()
            }
            (None, None) => false,
        }
    }
}

/// Cached multi-month report with cancellation reconciliation.
///
/// Every fetch takes a generation number. Results from a fetch whose
/// generation is no longer current are dropped, so a slow request for an
/// older range never overwrites a newer one. Only fetches bump the
/// generation: a range change that stays within the pending (or cached)
/// months just moves the window, and the pending fetch installs under the
/// latest requested range when it lands.
pub struct ReportBoard {
    source: Arc<dyn ReportSource>,
    tz: TzSpec,
    generation: AtomicU64,
    state: Mutex<BoardState>,
}

impl ReportBoard {
    pub fn new(source: Arc<dyn ReportSource>, range: DateRange, tz: TzSpec) -> Self {
        Self {
            source,
            tz,
            generation: AtomicU64::new(0),
            state: Mutex::new(BoardState {
                requested: range,
                search: String::new(),
                snapshot: None,
                in_flight: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        // State is replaced wholesale under the lock, a poisoned guard is
        // still consistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn timezone(&self) -> &TzSpec {
        &self.tz
    }

    pub fn range(&self) -> DateRange {
        self.lock().requested
    }

    pub fn search(&self) -> String {
        self.lock().search.clone()
    }

    /// Summary of the last applied fetch, if any.
    pub fn summary(&self) -> Option<RefreshSummary> {
        self.lock().snapshot.as_ref().map(|s| s.summary.clone())
    }

    /// Change the search term. Filters the cached data; no fetch.
    pub fn set_search(&self, term: impl Into<String>) {
        self.lock().search = term.into();
    }

    /// Fetch every month of the active range and replace the cache.
    pub async fn refresh(&self, session: &Session) -> RefreshOutcome {
        self.load(session).await
    }

    /// Move the window. Refetches only when the set of months changes or the
    /// cached fetch had failed months.
    pub async fn set_range(&self, session: &Session, range: DateRange) -> RefreshOutcome {
        let buckets = plan_range(&range);
        {
            let mut state = self.lock();
            state.requested = range;
            if state.covers(&buckets) {
                if let Some(snapshot) = state
                    .snapshot
                    .as_mut()
                    .filter(|snapshot| snapshot.summary.buckets == buckets)
                {
                    snapshot.range = range;
                }
                return RefreshOutcome::Refiltered;
            }
        }
        self.load(session).await
    }

    /// Fetch the months of the requested range as of dispatch.
    async fn load(&self, session: &Session) -> RefreshOutcome {
        let (generation, range, buckets) = {
            let mut state = self.lock();
            let range = state.requested;
            let buckets = plan_range(&range);
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.in_flight = Some(InFlight {
                generation,
                buckets: buckets.clone(),
            });
            (generation, range, buckets)
        };
        tracing::debug!(
            generation,
            start = %range.start,
            end = %range.end,
            buckets = buckets.len(),
            "Fetching report buckets"
        );

        let fetched = fetch_buckets(self.source.as_ref(), session, &buckets).await;
        let failed: Vec<MonthBucket> = fetched
            .iter()
            .filter(|f| f.failed())
            .map(|f| f.bucket)
            .collect();
        let merged = merge_reports(fetched.into_iter().map(|f| f.report));

        let mut state = self.lock();
        let current = self.generation.load(Ordering::SeqCst);
        if current != generation {
            tracing::debug!(generation, current, "Discarding superseded report fetch");
            return RefreshOutcome::Superseded;
        }
        state.in_flight = None;

        // Range changes since dispatch stayed within these months, otherwise
        // they would have started a newer fetch.
        let range = state.requested;
        debug_assert_eq!(plan_range(&range), buckets);
        let summary = RefreshSummary { buckets, failed };
        state.snapshot = Some(Snapshot {
            range,
            summary: summary.clone(),
            merged,
        });
        RefreshOutcome::Applied(summary)
    }

    /// The applied data projected through the current search and window.
    pub fn view(&self) -> ReportView {
        let state = self.lock();
        match &state.snapshot {
            Some(snapshot) => build_view(
                &snapshot.merged,
                &ReportFilter::new(state.search.clone(), snapshot.range),
                &self.tz,
            ),
            None => ReportView::empty(&ReportFilter::new(state.search.clone(), state.requested)),
        }
    }

    /// Look up a cached sale by id.
    pub fn sale(&self, sale_id: &str) -> Option<SaleRecord> {
        let state = self.lock();
        state.snapshot.as_ref().and_then(|snapshot| {
            snapshot
                .merged
                .values()
                .flat_map(|report| report.sales_details.iter())
                .find(|sale| sale.sale_id.as_deref() == Some(sale_id))
                .cloned()
        })
    }

    /// Cancel a sale, then rebuild from the server. On error nothing local
    /// changes.
    pub async fn cancel_sale(
        &self,
        session: &Session,
        sale_id: &str,
        reason: Option<&str>,
    ) -> Result<RefreshOutcome, ApiError> {
        self.source.cancel_sale(session, sale_id, reason).await?;
        tracing::info!(sale_id, "Sale cancelled; refreshing report");
        Ok(self.refresh(session).await)
    }

    /// Reverse a cancellation, then rebuild from the server.
    pub async fn undo_cancel_sale(
        &self,
        session: &Session,
        sale_id: &str,
    ) -> Result<RefreshOutcome, ApiError> {
        self.source.undo_cancel_sale(session, sale_id).await?;
        tracing::info!(sale_id, "Sale cancellation undone; refreshing report");
        Ok(self.refresh(session).await)
    }
}
