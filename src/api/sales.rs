use serde::Serialize;

use super::{functions, require_id};
use crate::client::{BaasClient, NoParams};
use crate::error::ApiError;
use crate::models::{SaleRecord, SalesHistoryPayload};
use crate::session::Session;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddSaleRequest<'a> {
    product_id: &'a str,
    quantity_sold: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelSaleRequest<'a> {
    sale_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
}

impl BaasClient {
    /// `add-sale`: record a sale against the caller's own stock.
    pub async fn add_sale(
        &self,
        session: &Session,
        product_id: &str,
        quantity_sold: i64,
    ) -> Result<serde_json::Value, ApiError> {
        require_id("product", product_id)?;
        if quantity_sold <= 0 {
            return Err(ApiError::invalid("quantity sold must be positive"));
        }
        let body = AddSaleRequest {
            product_id,
            quantity_sold,
        };
        self.call(session, functions::ADD_SALE, &body).await
    }

    /// `list-sales-by-user`: the caller's own sales.
    pub async fn sales_by_user(&self, session: &Session) -> Result<Vec<SaleRecord>, ApiError> {
        self.call(session, functions::LIST_SALES_BY_USER, &NoParams {})
            .await
    }

    /// `get-all-sales`.
    pub async fn all_sales(&self, session: &Session) -> Result<Vec<SaleRecord>, ApiError> {
        let payload: SalesHistoryPayload = self
            .call(session, functions::GET_ALL_SALES, &NoParams {})
            .await?;
        Ok(payload.sales_details)
    }

    /// `cancel-sale`. The server reverses the stock movement.
    pub async fn cancel_sale(
        &self,
        session: &Session,
        sale_id: &str,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        require_id("sale", sale_id)?;
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        let body = CancelSaleRequest { sale_id, reason };
        let _: serde_json::Value = self.call(session, functions::CANCEL_SALE, &body).await?;
        Ok(())
    }

    /// `undo-cancel-sale`.
    pub async fn undo_cancel_sale(&self, session: &Session, sale_id: &str) -> Result<(), ApiError> {
        require_id("sale", sale_id)?;
        let body = CancelSaleRequest {
            sale_id,
            reason: None,
        };
        let _: serde_json::Value = self
            .call(session, functions::UNDO_CANCEL_SALE, &body)
            .await?;
        Ok(())
    }
}
