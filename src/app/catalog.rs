use anyhow::{Context, Result};
use rust_decimal::Decimal;

use super::{AppContext, ProductOutput};
use crate::catalog::{search_products, ProductSort, SortDirection};
use crate::models::ProductDraft;

pub async fn list_products(
    ctx: &AppContext,
    search: &str,
    sort: ProductSort,
    direction: SortDirection,
) -> Result<Vec<ProductOutput>> {
    let session = ctx.session()?;
    let products = ctx
        .client
        .active_products(&session)
        .await
        .context("Failed to load products")?;
    Ok(search_products(&products, search, sort, direction)
        .iter()
        .map(|p| ProductOutput::new(p, &ctx.config.display))
        .collect())
}

pub async fn add_product(
    ctx: &AppContext,
    name: &str,
    stock: i64,
    price: Decimal,
) -> Result<ProductOutput> {
    let session = ctx.session()?;
    let draft = ProductDraft {
        product_name: name.to_string(),
        stock,
        price,
    };
    let product = ctx
        .client
        .add_product(&session, &draft)
        .await
        .context("Failed to add product")?;
    tracing::info!(product_id = %product.object_id, "Product added");
    Ok(ProductOutput::new(&product, &ctx.config.display))
}

pub async fn update_product(
    ctx: &AppContext,
    product_id: &str,
    name: &str,
    stock: i64,
    price: Decimal,
) -> Result<ProductOutput> {
    let session = ctx.session()?;
    let draft = ProductDraft {
        product_name: name.to_string(),
        stock,
        price,
    };
    let product = ctx
        .client
        .update_product(&session, product_id, &draft)
        .await
        .with_context(|| format!("Failed to update product {product_id}"))?;
    tracing::info!(product_id, "Product updated");
    Ok(ProductOutput::new(&product, &ctx.config.display))
}

pub async fn delete_product(ctx: &AppContext, product_id: &str) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .soft_delete_product(&session, product_id)
        .await
        .with_context(|| format!("Failed to delete product {product_id}"))?;
    tracing::info!(product_id, "Product deleted");
    Ok(serde_json::json!({ "success": true, "product_id": product_id }))
}

/// Move `quantity` units of a product into a reseller's stock.
pub async fn assign_stock(
    ctx: &AppContext,
    reseller_id: &str,
    product_id: &str,
    quantity: i64,
) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .assign_stock(&session, reseller_id, product_id, quantity)
        .await
        .context("Failed to assign stock")?;
    tracing::info!(reseller_id, product_id, quantity, "Stock assigned");
    Ok(serde_json::json!({
        "success": true,
        "reseller_id": reseller_id,
        "product_id": product_id,
        "quantity": quantity,
    }))
}
