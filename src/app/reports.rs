use std::sync::Arc;

use anyhow::{Context, Result};

use super::types::month_labels;
use super::{AppContext, MutationOutput, ReportOutput, ResellerReportOutput};
use crate::format::format_currency;
use crate::models::SaleAction;
use crate::period::DateRange;
use crate::report::{PageStates, RefreshOutcome, ReportBoard, ReportSource};

/// What to show in the report view.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub range: DateRange,
    pub search: String,
    /// Rows per reseller table; defaults to the configured page size.
    pub page_size: Option<usize>,
    /// Explicit page per reseller id (or name, for resellers without an id);
    /// others show their first page.
    pub pages: Vec<(String, usize)>,
}

impl ReportRequest {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            search: String::new(),
            page_size: None,
            pages: Vec::new(),
        }
    }
}

fn new_board(ctx: &AppContext, request: &ReportRequest) -> Result<ReportBoard> {
    let source: Arc<dyn ReportSource> = Arc::new(ctx.client.clone());
    let board = ReportBoard::new(source, request.range, ctx.timezone()?);
    board.set_search(request.search.clone());
    Ok(board)
}

fn ensure_ordered(range: &DateRange) -> Result<()> {
    anyhow::ensure!(
        !range.is_inverted(),
        "Start date {} is after end date {}",
        range.start,
        range.end
    );
    Ok(())
}

fn render(ctx: &AppContext, board: &ReportBoard, request: &ReportRequest) -> ReportOutput {
    let display = &ctx.config.display;
    let view = board.view();
    let summary = board.summary();

    let mut pages = PageStates::new(request.page_size.unwrap_or(ctx.config.reports.page_size));
    for (key, page) in &request.pages {
        pages.set_page(key, *page);
    }

    ReportOutput {
        start: view.range.start.to_string(),
        end: view.range.end.to_string(),
        search: view.search.clone(),
        timezone: board.timezone().label(),
        months: summary
            .as_ref()
            .map(|s| month_labels(&s.buckets))
            .unwrap_or_default(),
        failed_months: summary
            .as_ref()
            .map(|s| month_labels(&s.failed))
            .unwrap_or_default(),
        total_sales: view.total_sales,
        total_revenue: format_currency(view.total_revenue, display),
        resellers: view
            .resellers
            .iter()
            .map(|r| ResellerReportOutput::new(r, pages.get(r.pager_key()), display))
            .collect(),
    }
}

/// Fetch and aggregate every month of the requested range.
pub async fn report(ctx: &AppContext, request: &ReportRequest) -> Result<ReportOutput> {
    let session = ctx.session()?;
    ensure_ordered(&request.range)?;
    let board = new_board(ctx, request)?;
    board.refresh(&session).await;
    Ok(render(ctx, &board, request))
}

async fn mutate(
    ctx: &AppContext,
    request: &ReportRequest,
    sale_id: &str,
    action: SaleAction,
    reason: Option<&str>,
) -> Result<MutationOutput> {
    let session = ctx.session()?;
    ensure_ordered(&request.range)?;
    let board = new_board(ctx, request)?;
    let outcome = match action {
        SaleAction::Cancel => board
            .cancel_sale(&session, sale_id, reason)
            .await
            .with_context(|| format!("Failed to cancel sale {sale_id}"))?,
        SaleAction::UndoCancel => board
            .undo_cancel_sale(&session, sale_id)
            .await
            .with_context(|| format!("Failed to undo cancellation of sale {sale_id}"))?,
    };

    Ok(MutationOutput {
        success: true,
        sale_id: sale_id.to_string(),
        action,
        refreshed: !matches!(outcome, RefreshOutcome::Superseded),
        report: render(ctx, &board, request),
    })
}

/// Cancel a sale and return the refreshed report for `request`.
pub async fn cancel_sale(
    ctx: &AppContext,
    request: &ReportRequest,
    sale_id: &str,
    reason: Option<&str>,
) -> Result<MutationOutput> {
    mutate(ctx, request, sale_id, SaleAction::Cancel, reason).await
}

/// Undo a cancellation and return the refreshed report for `request`.
pub async fn undo_cancel_sale(
    ctx: &AppContext,
    request: &ReportRequest,
    sale_id: &str,
) -> Result<MutationOutput> {
    mutate(ctx, request, sale_id, SaleAction::UndoCancel, None).await
}
