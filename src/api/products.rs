use rust_decimal::Decimal;
use serde::Serialize;

use super::{functions, require_id};
use crate::client::{BaasClient, NoParams};
use crate::error::ApiError;
use crate::models::{Product, ProductDraft};
use crate::session::Session;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<&'a str>,
    product_name: &'a str,
    stock: i64,
    // Sent as a JSON number, which the backend stores as a float.
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductIdRequest<'a> {
    product_id: &'a str,
}

fn validate(draft: &ProductDraft) -> Result<(), ApiError> {
    if draft.product_name.trim().is_empty() {
        return Err(ApiError::invalid("product name is required"));
    }
    if draft.stock < 0 {
        return Err(ApiError::invalid("stock cannot be negative"));
    }
    if draft.price <= Decimal::ZERO {
        return Err(ApiError::invalid("price must be positive"));
    }
    Ok(())
}

impl BaasClient {
    /// `list-active-products`. Soft-deleted products are excluded server-side.
    pub async fn active_products(&self, session: &Session) -> Result<Vec<Product>, ApiError> {
        self.call(session, functions::LIST_ACTIVE_PRODUCTS, &NoParams {})
            .await
    }

    /// `add-product`. Returns the created product.
    pub async fn add_product(
        &self,
        session: &Session,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        validate(draft)?;
        let body = ProductRequest {
            product_id: None,
            product_name: draft.product_name.trim(),
            stock: draft.stock,
            price: draft.price,
        };
        let product: Option<Product> = self.call(session, functions::ADD_PRODUCT, &body).await?;
        product.ok_or_else(|| ApiError::EmptyResult {
            function: functions::ADD_PRODUCT.to_string(),
        })
    }

    /// `update-product`. Returns the updated product.
    pub async fn update_product(
        &self,
        session: &Session,
        product_id: &str,
        draft: &ProductDraft,
    ) -> Result<Product, ApiError> {
        require_id("product", product_id)?;
        validate(draft)?;
        let body = ProductRequest {
            product_id: Some(product_id),
            product_name: draft.product_name.trim(),
            stock: draft.stock,
            price: draft.price,
        };
        let product: Option<Product> =
            self.call(session, functions::UPDATE_PRODUCT, &body).await?;
        product.ok_or_else(|| ApiError::EmptyResult {
            function: functions::UPDATE_PRODUCT.to_string(),
        })
    }

    /// `soft-delete-product`.
    pub async fn soft_delete_product(
        &self,
        session: &Session,
        product_id: &str,
    ) -> Result<(), ApiError> {
        require_id("product", product_id)?;
        let _: serde_json::Value = self
            .call(
                session,
                functions::SOFT_DELETE_PRODUCT,
                &ProductIdRequest { product_id },
            )
            .await?;
        Ok(())
    }
}
