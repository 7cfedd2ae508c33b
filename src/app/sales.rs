use anyhow::{Context, Result};
use chrono::Datelike;

use super::{AppContext, DashboardOutput, HistoryOutput, SaleRowOutput, StockOutput};
use crate::format::format_currency;
use crate::history::{monthly_quantity, SalesHistory};
use crate::period::{Clock, DateRange};

/// Quantity the signed-in reseller sold this calendar month.
pub async fn dashboard(ctx: &AppContext, clock: &dyn Clock) -> Result<DashboardOutput> {
    let session = ctx.session()?;
    let tz = ctx.timezone()?;
    let sales = ctx
        .client
        .sales_by_user(&session)
        .await
        .context("Failed to load your sales")?;
    let today = tz.today(clock);
    Ok(DashboardOutput {
        fullname: session.fullname.clone(),
        month: format!("{:04}-{:02}", today.year(), today.month()),
        quantity_sold: monthly_quantity(&sales, today, &tz),
    })
}

/// The signed-in reseller's stock, as offered by the new-sale form.
pub async fn current_stock(ctx: &AppContext) -> Result<Vec<StockOutput>> {
    let session = ctx.session()?;
    let stock = ctx
        .client
        .current_stock(&session)
        .await
        .context("Failed to load stock")?;
    Ok(stock
        .iter()
        .map(|item| StockOutput::new(item, &ctx.config.display))
        .collect())
}

/// Register a sale. Quantity is checked against the caller's current stock
/// before dispatch when the product is listed there.
pub async fn register_sale(
    ctx: &AppContext,
    product_id: &str,
    quantity: i64,
) -> Result<serde_json::Value> {
    let session = ctx.session()?;
    anyhow::ensure!(!product_id.trim().is_empty(), "Select a product");
    anyhow::ensure!(quantity > 0, "Quantity must be positive");

    let stock = ctx
        .client
        .current_stock(&session)
        .await
        .context("Failed to load stock")?;
    if let Some(item) = stock.iter().find(|item| item.product_id == product_id) {
        anyhow::ensure!(
            quantity <= item.quantity,
            "Only {} unit(s) of {} in stock",
            item.quantity,
            item.product_name
        );
    }

    let created = ctx
        .client
        .add_sale(&session, product_id, quantity)
        .await
        .context("Failed to register sale")?;
    tracing::info!(product_id, quantity, "Sale registered");
    Ok(serde_json::json!({
        "success": true,
        "product_id": product_id,
        "quantity_sold": quantity,
        "sale": created,
    }))
}

/// One page of the all-sales history for `range`.
pub async fn sales_history(
    ctx: &AppContext,
    range: DateRange,
    page: usize,
    page_size: Option<usize>,
) -> Result<HistoryOutput> {
    let session = ctx.session()?;
    let tz = ctx.timezone()?;
    let sales = ctx
        .client
        .all_sales(&session)
        .await
        .context("Failed to load sales history")?;

    let mut history = SalesHistory::new(
        sales,
        range,
        tz,
        page_size.unwrap_or(ctx.config.reports.page_size),
    );
    history.set_page(page);
    let current = history.current_page();
    let display = &ctx.config.display;
    Ok(HistoryOutput {
        start: current.range.start.to_string(),
        end: current.range.end.to_string(),
        total_sales: current.totals.total_sales,
        total_revenue: format_currency(current.totals.total_revenue, display),
        matching: current.matching,
        page: current.page,
        page_count: current.page_count,
        sales: current
            .sales
            .iter()
            .map(|sale| SaleRowOutput::new(sale, display))
            .collect(),
    })
}
