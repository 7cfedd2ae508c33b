use futures::future::join_all;

use super::{MonthBucket, ReportSource};
use crate::models::ReportMap;
use crate::session::Session;

/// What one bucket contributed to a fetch cycle.
#[derive(Debug, Clone)]
pub struct BucketFetch {
    pub bucket: MonthBucket,
    /// Empty when the fetch failed.
    pub report: ReportMap,
    pub error: Option<String>,
}

impl BucketFetch {
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Fetch every bucket concurrently and wait for all of them to settle.
///
/// A failing bucket is logged and contributes an empty mapping; it never
/// aborts its siblings. There is no retry. Results keep the order of
/// `buckets`.
pub async fn fetch_buckets(
    source: &dyn ReportSource,
    session: &Session,
    buckets: &[MonthBucket],
) -> Vec<BucketFetch> {
    join_all(buckets.iter().map(|&bucket| async move {
        match source.monthly_report(session, bucket).await {
            Ok(report) => BucketFetch {
                bucket,
                report,
                error: None,
            },
            Err(err) => {
                tracing::warn!(
                    year = bucket.year,
                    month = bucket.month,
                    error = %err,
                    "Report bucket fetch failed; treating month as empty"
                );
                BucketFetch {
                    bucket,
                    report: ReportMap::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }))
    .await
}
