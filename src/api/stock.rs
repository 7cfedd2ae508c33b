use futures::future::join_all;
use serde::Serialize;

use super::{functions, require_id};
use crate::client::{BaasClient, NoParams};
use crate::error::ApiError;
use crate::models::StockItem;
use crate::session::Session;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignStockRequest<'a> {
    user_id: &'a str,
    product_id: &'a str,
    stock: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResellerRequest<'a> {
    reseller_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReturnStockRequest<'a> {
    reseller_id: &'a str,
    product_id: &'a str,
    quantity: i64,
}

/// One product quantity to hand back from a reseller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnLine {
    pub product_id: String,
    pub quantity: i64,
}

/// Outcome of one line of a batch return.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnOutcome {
    pub product_id: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReturnOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

impl BaasClient {
    /// `get-current-stock`: the caller's own stock.
    pub async fn current_stock(&self, session: &Session) -> Result<Vec<StockItem>, ApiError> {
        self.call(session, functions::GET_CURRENT_STOCK, &NoParams {})
            .await
    }

    /// `add-stock`: assign product units to a reseller.
    pub async fn assign_stock(
        &self,
        session: &Session,
        reseller_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), ApiError> {
        require_id("reseller", reseller_id)?;
        require_id("product", product_id)?;
        if quantity <= 0 {
            return Err(ApiError::invalid("quantity must be positive"));
        }
        let body = AssignStockRequest {
            user_id: reseller_id,
            product_id,
            stock: quantity,
        };
        let _: serde_json::Value = self.call(session, functions::ADD_STOCK, &body).await?;
        Ok(())
    }

    /// `get-reseller-stock`.
    pub async fn reseller_stock(
        &self,
        session: &Session,
        reseller_id: &str,
    ) -> Result<Vec<StockItem>, ApiError> {
        require_id("reseller", reseller_id)?;
        self.call(
            session,
            functions::GET_RESELLER_STOCK,
            &ResellerRequest { reseller_id },
        )
        .await
    }

    /// `return-stock` for a single product.
    pub async fn return_stock(
        &self,
        session: &Session,
        reseller_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), ApiError> {
        require_id("reseller", reseller_id)?;
        require_id("product", product_id)?;
        if quantity <= 0 {
            return Err(ApiError::invalid("return quantity must be positive"));
        }
        let body = ReturnStockRequest {
            reseller_id,
            product_id,
            quantity,
        };
        let _: serde_json::Value = self.call(session, functions::RETURN_STOCK, &body).await?;
        Ok(())
    }

    /// Return several products at once.
    ///
    /// Lines with a non-positive quantity are skipped; if none remain the
    /// batch is rejected. All requests run concurrently and each line's
    /// outcome is reported.
    pub async fn return_stock_batch(
        &self,
        session: &Session,
        reseller_id: &str,
        lines: &[ReturnLine],
    ) -> Result<Vec<ReturnOutcome>, ApiError> {
        require_id("reseller", reseller_id)?;
        let lines: Vec<&ReturnLine> = lines.iter().filter(|l| l.quantity > 0).collect();
        if lines.is_empty() {
            return Err(ApiError::invalid(
                "set a positive quantity for at least one product",
            ));
        }

        let results = join_all(lines.iter().map(|line| async move {
            let result = self
                .return_stock(session, reseller_id, &line.product_id, line.quantity)
                .await;
            if let Err(err) = &result {
                tracing::warn!(
                    reseller_id,
                    product_id = %line.product_id,
                    error = %err,
                    "Stock return failed"
                );
            }
            ReturnOutcome {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                error: result.err().map(|e| e.to_string()),
            }
        }))
        .await;

        Ok(results)
    }

    /// Return every product the reseller currently holds.
    pub async fn return_all_stock(
        &self,
        session: &Session,
        reseller_id: &str,
    ) -> Result<Vec<ReturnOutcome>, ApiError> {
        let stock = self.reseller_stock(session, reseller_id).await?;
        let lines = return_all_lines(&stock);
        if lines.is_empty() {
            return Err(ApiError::invalid("reseller holds no stock to return"));
        }
        self.return_stock_batch(session, reseller_id, &lines).await
    }
}

fn return_all_lines(stock: &[StockItem]) -> Vec<ReturnLine> {
    stock
        .iter()
        .filter(|item| item.quantity > 0)
        .map(|item| ReturnLine {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
        })
        .collect()
}
