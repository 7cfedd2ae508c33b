//! Sales-history and dashboard projections over flat sale lists.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{SaleRecord, SaleTotals};
use crate::period::{DateRange, TzSpec};
use crate::report::PageState;

/// Sales inside `range`, in server order. Sales without a date are dropped.
pub fn sales_in_window(sales: &[SaleRecord], range: &DateRange, tz: &TzSpec) -> Vec<SaleRecord> {
    if range.is_inverted() {
        return Vec::new();
    }
    sales
        .iter()
        .filter(|sale| sale.sale_day(tz).is_some_and(|day| range.contains(day)))
        .cloned()
        .collect()
}

/// Quantity sold in the calendar month containing `today`, cancelled
/// sales excluded.
pub fn monthly_quantity(sales: &[SaleRecord], today: NaiveDate, tz: &TzSpec) -> i64 {
    sales
        .iter()
        .filter(|sale| sale.counts_toward_totals())
        .filter(|sale| {
            sale.sale_day(tz)
                .is_some_and(|day| day.year() == today.year() && day.month() == today.month())
        })
        .map(|sale| sale.quantity_sold)
        .sum()
}

/// One page of the sales-history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPage {
    pub range: DateRange,
    pub totals: SaleTotals,
    pub matching: usize,
    pub page: PageState,
    pub page_count: usize,
    pub sales: Vec<SaleRecord>,
}

/// Single-table history view: the window, its totals and a pager that
/// returns to the first page whenever the window changes.
#[derive(Debug, Clone)]
pub struct SalesHistory {
    all: Vec<SaleRecord>,
    tz: TzSpec,
    range: DateRange,
    filtered: Vec<SaleRecord>,
    page: PageState,
}

impl SalesHistory {
    pub fn new(all: Vec<SaleRecord>, range: DateRange, tz: TzSpec, page_size: usize) -> Self {
        let filtered = sales_in_window(&all, &range, &tz);
        Self {
            all,
            tz,
            range,
            filtered,
            page: PageState::first(page_size),
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn set_range(&mut self, range: DateRange) {
        self.range = range;
        self.filtered = sales_in_window(&self.all, &range, &self.tz);
        self.page.page = 0;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page.page = page;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page = PageState::first(page_size);
    }

    pub fn filtered(&self) -> &[SaleRecord] {
        &self.filtered
    }

    pub fn totals(&self) -> SaleTotals {
        SaleTotals::of(&self.filtered)
    }

    pub fn current_page(&self) -> HistoryPage {
        HistoryPage {
            range: self.range,
            totals: self.totals(),
            matching: self.filtered.len(),
            page: self.page,
            page_count: self.page.page_count(self.filtered.len()),
            sales: self.page.slice(&self.filtered).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sale(qty: i64, y: i32, m: u32, day: u32) -> SaleRecord {
        SaleRecord::new(
            "Batom",
            qty,
            Decimal::new(qty * 1000, 2),
            Utc.with_ymd_and_hms(y, m, day, 15, 0, 0).unwrap(),
        )
    }

    #[test]
    fn window_drops_undated_and_out_of_range() {
        let mut undated = sale(1, 2024, 3, 1);
        undated.sale_date = None;
        let sales = vec![sale(1, 2024, 2, 29), sale(2, 2024, 3, 1), undated, sale(3, 2024, 3, 31)];
        let kept = sales_in_window(
            &sales,
            &DateRange::new(d(2024, 3, 1), d(2024, 3, 31)),
            &TzSpec::utc(),
        );
        let qty: Vec<i64> = kept.iter().map(|s| s.quantity_sold).collect();
        assert_eq!(qty, vec![2, 3]);
    }

    #[test]
    fn monthly_quantity_ignores_other_years_and_cancelled() {
        let sales = vec![
            sale(2, 2024, 5, 2),
            sale(4, 2024, 5, 20).cancelled(None, None),
            sale(7, 2023, 5, 2),
            sale(1, 2024, 4, 30),
            sale(3, 2024, 5, 31),
        ];
        assert_eq!(monthly_quantity(&sales, d(2024, 5, 15), &TzSpec::utc()), 5);
    }

    #[test]
    fn changing_window_resets_page_and_totals() {
        let sales: Vec<SaleRecord> = (1..=25).map(|day| sale(1, 2024, 1, day)).collect();
        let mut history = SalesHistory::new(
            sales,
            DateRange::new(d(2024, 1, 1), d(2024, 1, 31)),
            TzSpec::utc(),
            10,
        );
        history.set_page(2);
        let page = history.current_page();
        assert_eq!(page.matching, 25);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.sales.len(), 5);
        assert_eq!(page.totals.total_sales, 25);

        history.set_range(DateRange::new(d(2024, 1, 1), d(2024, 1, 10)));
        let page = history.current_page();
        assert_eq!(page.page.page, 0);
        assert_eq!(page.matching, 10);
        assert_eq!(page.totals.total_revenue, Decimal::new(10000, 2));
    }
}
