use std::fmt;

use serde::Serialize;

use super::functions;
use crate::client::BaasClient;
use crate::error::ApiError;
use crate::models::ReportMap;
use crate::session::Session;

/// One (year, month) unit of report data. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
}

impl MonthBucket {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Serialize)]
struct MonthlyReportRequest {
    month: u32,
    year: i32,
}

impl BaasClient {
    /// `get-admin-reports` for one month.
    pub async fn admin_report(
        &self,
        session: &Session,
        bucket: MonthBucket,
    ) -> Result<ReportMap, ApiError> {
        let body = MonthlyReportRequest {
            month: bucket.month,
            year: bucket.year,
        };
        self.call(session, functions::GET_ADMIN_REPORTS, &body).await
    }

    /// `get-admin-reports` without a period: the server's all-time view,
    /// used by the reseller roster for its sales counts.
    pub async fn admin_report_all_time(&self, session: &Session) -> Result<ReportMap, ApiError> {
        self.call(
            session,
            functions::GET_ADMIN_REPORTS,
            &crate::client::NoParams {},
        )
        .await
    }
}
