use async_trait::async_trait;

use super::MonthBucket;
use crate::client::BaasClient;
use crate::error::ApiError;
use crate::models::ReportMap;
use crate::session::Session;

/// Remote side of the report pipeline: monthly reads plus the two
/// cancellation mutations.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn monthly_report(
        &self,
        session: &Session,
        bucket: MonthBucket,
    ) -> Result<ReportMap, ApiError>;

    async fn cancel_sale(
        &self,
        session: &Session,
        sale_id: &str,
        reason: Option<&str>,
    ) -> Result<(), ApiError>;

    async fn undo_cancel_sale(&self, session: &Session, sale_id: &str) -> Result<(), ApiError>;
}

#[async_trait]
impl ReportSource for BaasClient {
    async fn monthly_report(
        &self,
        session: &Session,
        bucket: MonthBucket,
    ) -> Result<ReportMap, ApiError> {
        self.admin_report(session, bucket).await
    }

    async fn cancel_sale(
        &self,
        session: &Session,
        sale_id: &str,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        BaasClient::cancel_sale(self, session, sale_id, reason).await
    }

    async fn undo_cancel_sale(&self, session: &Session, sale_id: &str) -> Result<(), ApiError> {
        BaasClient::undo_cancel_sale(self, session, sale_id).await
    }
}
