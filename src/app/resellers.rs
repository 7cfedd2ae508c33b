use std::path::Path;

use anyhow::{Context, Result};

use super::{AppContext, ReturnBatchOutput, StockOutput};
use crate::api::ReturnLine;
use crate::catalog::{filter_roster, roster_rows, RosterFilter, RosterRow};
use crate::models::{Contract, ResellerDraft, SellerDetails};

/// Roster joined with all-time sales counts.
pub async fn reseller_roster(ctx: &AppContext, filter: &RosterFilter) -> Result<Vec<RosterRow>> {
    let session = ctx.session()?;
    let (resellers, report) = tokio::try_join!(
        ctx.client.resellers_summary(&session),
        ctx.client.admin_report_all_time(&session),
    )
    .context("Failed to load resellers")?;
    Ok(filter_roster(&roster_rows(&resellers, &report), filter))
}

pub async fn add_reseller(ctx: &AppContext, draft: &ResellerDraft) -> Result<serde_json::Value> {
    ctx.client
        .signup(draft)
        .await
        .context("Failed to create reseller")?;
    tracing::info!(email = %draft.email, "Reseller created");
    Ok(serde_json::json!({ "success": true, "email": draft.email }))
}

pub async fn update_reseller(
    ctx: &AppContext,
    user_id: &str,
    draft: &ResellerDraft,
) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .update_user(&session, user_id, draft)
        .await
        .with_context(|| format!("Failed to update reseller {user_id}"))?;
    Ok(serde_json::json!({ "success": true, "user_id": user_id }))
}

pub async fn delete_reseller(ctx: &AppContext, user_id: &str) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .soft_delete_user(&session, user_id)
        .await
        .with_context(|| format!("Failed to delete reseller {user_id}"))?;
    tracing::info!(user_id, "Reseller deleted");
    Ok(serde_json::json!({ "success": true, "user_id": user_id }))
}

pub async fn restore_reseller(ctx: &AppContext, user_id: &str) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .restore_user(&session, user_id)
        .await
        .with_context(|| format!("Failed to restore reseller {user_id}"))?;
    tracing::info!(user_id, "Reseller restored");
    Ok(serde_json::json!({ "success": true, "user_id": user_id }))
}

pub async fn reseller_stock(ctx: &AppContext, reseller_id: &str) -> Result<Vec<StockOutput>> {
    let session = ctx.session()?;
    let stock = ctx
        .client
        .reseller_stock(&session, reseller_id)
        .await
        .with_context(|| format!("Failed to load stock for reseller {reseller_id}"))?;
    Ok(stock
        .iter()
        .map(|item| StockOutput::new(item, &ctx.config.display))
        .collect())
}

pub async fn return_stock(
    ctx: &AppContext,
    reseller_id: &str,
    product_id: &str,
    quantity: i64,
) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .return_stock(&session, reseller_id, product_id, quantity)
        .await
        .context("Failed to return stock")?;
    tracing::info!(reseller_id, product_id, quantity, "Stock returned");
    Ok(serde_json::json!({
        "success": true,
        "reseller_id": reseller_id,
        "product_id": product_id,
        "quantity": quantity,
    }))
}

pub async fn return_stock_batch(
    ctx: &AppContext,
    reseller_id: &str,
    lines: &[ReturnLine],
) -> Result<ReturnBatchOutput> {
    let session = ctx.session()?;
    let outcomes = ctx
        .client
        .return_stock_batch(&session, reseller_id, lines)
        .await
        .context("Failed to return stock")?;
    Ok(ReturnBatchOutput::new(reseller_id, outcomes))
}

pub async fn return_all_stock(ctx: &AppContext, reseller_id: &str) -> Result<ReturnBatchOutput> {
    let session = ctx.session()?;
    let outcomes = ctx
        .client
        .return_all_stock(&session, reseller_id)
        .await
        .context("Failed to return stock")?;
    Ok(ReturnBatchOutput::new(reseller_id, outcomes))
}

pub async fn seller_details(ctx: &AppContext, seller_id: &str) -> Result<SellerDetails> {
    let session = ctx.session()?;
    ctx.client
        .seller_details(&session, seller_id)
        .await
        .with_context(|| format!("Failed to load details for seller {seller_id}"))
}

pub async fn update_seller_details(
    ctx: &AppContext,
    seller_id: &str,
    contact: &str,
    address: &str,
) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .update_seller_details(&session, seller_id, contact, address)
        .await
        .with_context(|| format!("Failed to update details for seller {seller_id}"))?;
    Ok(serde_json::json!({ "success": true, "seller_id": seller_id }))
}

pub async fn list_contracts(ctx: &AppContext, seller_id: &str) -> Result<Vec<Contract>> {
    let session = ctx.session()?;
    ctx.client
        .seller_contracts(&session, seller_id)
        .await
        .with_context(|| format!("Failed to load contracts for seller {seller_id}"))
}

/// Upload a contract file from disk.
pub async fn upload_contract(
    ctx: &AppContext,
    seller_id: &str,
    title: Option<&str>,
    file: &Path,
) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read contract file {}", file.display()))?;
    ctx.client
        .upload_contract(&session, seller_id, title, &bytes)
        .await
        .context("Failed to upload contract")?;
    tracing::info!(seller_id, bytes = bytes.len(), "Contract uploaded");
    Ok(serde_json::json!({
        "success": true,
        "seller_id": seller_id,
        "file": file.display().to_string(),
    }))
}

pub async fn rename_contract(
    ctx: &AppContext,
    contract_id: &str,
    title: &str,
) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .rename_contract(&session, contract_id, title)
        .await
        .with_context(|| format!("Failed to rename contract {contract_id}"))?;
    Ok(serde_json::json!({ "success": true, "contract_id": contract_id, "title": title }))
}

pub async fn delete_contract(ctx: &AppContext, contract_id: &str) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    ctx.client
        .delete_contract(&session, contract_id)
        .await
        .with_context(|| format!("Failed to delete contract {contract_id}"))?;
    Ok(serde_json::json!({ "success": true, "contract_id": contract_id }))
}
