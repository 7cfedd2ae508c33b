use serde::Serialize;

use super::AppContext;
use crate::api::ReturnOutcome;
use crate::config::DisplayConfig;
use crate::format::format_currency;
use crate::models::{Product, SaleAction, SaleRecord, SaleStatus, StockItem};
use crate::report::{MonthBucket, PageState, ResellerView, SaleRow};
use crate::session::Session;

/// JSON output for the stored session. The token is never printed.
#[derive(Serialize)]
pub struct SessionOutput {
    pub session_file: String,
    pub present: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl SessionOutput {
    pub(crate) fn from_session(ctx: &AppContext, session: Option<&Session>) -> Self {
        Self {
            session_file: ctx.sessions.path().display().to_string(),
            present: session.is_some(),
            fullname: session.and_then(|s| s.fullname.clone()),
            user_id: session.and_then(|s| s.user_id.clone()),
        }
    }
}

/// JSON output for the reseller dashboard.
#[derive(Serialize)]
pub struct DashboardOutput {
    pub fullname: Option<String>,
    pub month: String,
    pub quantity_sold: i64,
}

/// JSON output for a stock line.
#[derive(Serialize)]
pub struct StockOutput {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl StockOutput {
    pub(crate) fn new(item: &StockItem, display: &DisplayConfig) -> Self {
        Self {
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            price: item.price.map(|p| format_currency(p, display)),
        }
    }
}

/// JSON output for a catalog product.
#[derive(Serialize)]
pub struct ProductOutput {
    pub id: String,
    pub name: String,
    pub stock: i64,
    pub price: String,
}

impl ProductOutput {
    pub(crate) fn new(product: &Product, display: &DisplayConfig) -> Self {
        Self {
            id: product.object_id.clone(),
            name: product.product_name.clone(),
            stock: product.stock,
            price: format_currency(product.price, display),
        }
    }
}

/// JSON output for one sale row.
#[derive(Debug, Serialize)]
pub struct SaleRowOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<String>,
    pub product_name: String,
    pub quantity_sold: i64,
    pub total_price: String,
    pub sale_date: Option<String>,
    pub status: SaleStatus,
    /// The one action offered for this row.
    pub action: SaleAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl SaleRowOutput {
    pub(crate) fn new(sale: &SaleRecord, display: &DisplayConfig) -> Self {
        let status = sale.status();
        Self {
            sale_id: sale.sale_id.clone(),
            product_name: sale.product_name.clone(),
            quantity_sold: sale.quantity_sold,
            total_price: format_currency(sale.total_price, display),
            sale_date: sale.sale_date.map(|d| d.to_rfc3339()),
            status,
            action: status.available_action(),
            cancelled_by: sale.cancelled_by.clone(),
            cancellation_reason: sale.cancellation_reason.clone(),
        }
    }

    pub(crate) fn from_row(row: &SaleRow, display: &DisplayConfig) -> Self {
        Self::new(&row.sale, display)
    }
}

/// JSON output for one reseller in the report.
#[derive(Debug, Serialize)]
pub struct ResellerReportOutput {
    pub name: String,
    pub reseller_id: String,
    pub total_sales: i64,
    pub total_revenue: String,
    pub sale_count: usize,
    pub page: PageState,
    pub page_count: usize,
    pub sales: Vec<SaleRowOutput>,
}

impl ResellerReportOutput {
    pub(crate) fn new(reseller: &ResellerView, page: PageState, display: &DisplayConfig) -> Self {
        Self {
            name: reseller.name.clone(),
            reseller_id: reseller.reseller_id.clone(),
            total_sales: reseller.total_sales,
            total_revenue: format_currency(reseller.total_revenue, display),
            sale_count: reseller.sales.len(),
            page,
            page_count: page.page_count(reseller.sales.len()),
            sales: page
                .slice(&reseller.sales)
                .iter()
                .map(|row| SaleRowOutput::from_row(row, display))
                .collect(),
        }
    }
}

/// JSON output for the multi-month sales report.
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub start: String,
    pub end: String,
    pub search: String,
    pub timezone: String,
    pub months: Vec<String>,
    /// Months whose fetch failed; shown as empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_months: Vec<String>,
    pub total_sales: i64,
    pub total_revenue: String,
    pub resellers: Vec<ResellerReportOutput>,
}

pub(crate) fn month_labels(buckets: &[MonthBucket]) -> Vec<String> {
    buckets.iter().map(ToString::to_string).collect()
}

/// JSON output for cancel/undo.
#[derive(Debug, Serialize)]
pub struct MutationOutput {
    pub success: bool,
    pub sale_id: String,
    pub action: SaleAction,
    /// False when a newer refresh replaced this one.
    pub refreshed: bool,
    pub report: ReportOutput,
}

/// JSON output for the sales-history table.
#[derive(Serialize)]
pub struct HistoryOutput {
    pub start: String,
    pub end: String,
    pub total_sales: i64,
    pub total_revenue: String,
    pub matching: usize,
    pub page: PageState,
    pub page_count: usize,
    pub sales: Vec<SaleRowOutput>,
}

/// JSON output for a batch stock return.
#[derive(Serialize)]
pub struct ReturnBatchOutput {
    pub reseller_id: String,
    pub returned: usize,
    pub failed: usize,
    pub lines: Vec<ReturnOutcome>,
}

impl ReturnBatchOutput {
    pub(crate) fn new(reseller_id: &str, lines: Vec<ReturnOutcome>) -> Self {
        let returned = lines.iter().filter(|l| l.succeeded()).count();
        Self {
            reseller_id: reseller_id.to_string(),
            returned,
            failed: lines.len() - returned,
            lines,
        }
    }
}
