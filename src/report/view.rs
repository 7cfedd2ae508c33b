use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::{ReportMap, SaleAction, SaleRecord, SaleStatus, SaleTotals};
use crate::period::{DateRange, TzSpec};

/// Search term plus inclusive day window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub search: String,
    pub range: DateRange,
}

impl ReportFilter {
    pub fn new(search: impl Into<String>, range: DateRange) -> Self {
        Self {
            search: search.into(),
            range,
        }
    }
}

/// One sale row as displayed, with the action its state allows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRow {
    #[serde(flatten)]
    pub sale: SaleRecord,
    pub status: SaleStatus,
    pub action: SaleAction,
}

impl From<&SaleRecord> for SaleRow {
    fn from(sale: &SaleRecord) -> Self {
        let status = sale.status();
        Self {
            sale: sale.clone(),
            status,
            action: status.available_action(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResellerView {
    pub name: String,
    pub reseller_id: String,
    pub total_sales: i64,
    pub total_revenue: Decimal,
    /// In-window sales, cancelled ones included.
    pub sales: Vec<SaleRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub range: DateRange,
    pub search: String,
    pub resellers: Vec<ResellerView>,
    pub total_sales: i64,
    pub total_revenue: Decimal,
}

impl ResellerView {
    /// Key for this reseller's pager: the id, or the name when the backend
    /// sent no id.
    pub fn pager_key(&self) -> &str {
        if self.reseller_id.is_empty() {
            &self.name
        } else {
            &self.reseller_id
        }
    }
}

impl ReportView {
    pub fn empty(filter: &ReportFilter) -> Self {
        Self {
            range: filter.range,
            search: filter.search.clone(),
            resellers: Vec::new(),
            total_sales: 0,
            total_revenue: Decimal::ZERO,
        }
    }

    pub fn reseller(&self, name: &str) -> Option<&ResellerView> {
        self.resellers.iter().find(|r| r.name == name)
    }
}

/// Case-insensitive substring match. An empty term matches every name.
pub fn name_matches(name: &str, term: &str) -> bool {
    term.is_empty() || name.to_lowercase().contains(&term.to_lowercase())
}

/// Lowercase with accents stripped, so "Álvaro" files under "a".
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Name ordering in dictionary order: accent- and case-folded first, then
/// case-folded, then exact as a stable tie-break.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// Project the merged mapping through `filter`.
///
/// Resellers with no sale inside the window are dropped even if the name
/// matched. Sales without a date never fall inside a window. Result is
/// sorted by total sales descending, then name.
pub fn build_view(merged: &ReportMap, filter: &ReportFilter, tz: &TzSpec) -> ReportView {
    let mut view = ReportView::empty(filter);
    if filter.range.is_inverted() {
        return view;
    }

    let mut resellers: Vec<ResellerView> = merged
        .iter()
        .filter(|(name, _)| name_matches(name, &filter.search))
        .filter_map(|(name, report)| {
            let in_window: Vec<&SaleRecord> = report
                .sales_details
                .iter()
                .filter(|sale| {
                    sale.sale_day(tz)
                        .is_some_and(|day| filter.range.contains(day))
                })
                .collect();
            if in_window.is_empty() {
                return None;
            }

            let totals = SaleTotals::of(in_window.iter().copied());
            Some(ResellerView {
                name: name.clone(),
                reseller_id: report.reseller_id.clone(),
                total_sales: totals.total_sales,
                total_revenue: totals.total_revenue,
                sales: in_window.into_iter().map(SaleRow::from).collect(),
            })
        })
        .collect();

    resellers.sort_by(|a, b| {
        b.total_sales
            .cmp(&a.total_sales)
            .then_with(|| compare_names(&a.name, &b.name))
    });

    for reseller in &resellers {
        view.total_sales += reseller.total_sales;
        view.total_revenue += reseller.total_revenue;
    }
    view.resellers = resellers;
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResellerReport;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sale(id: &str, qty: i64, price: i64, y: i32, m: u32, day: u32) -> SaleRecord {
        SaleRecord::new(
            "Creme",
            qty,
            Decimal::new(price, 0),
            Utc.with_ymd_and_hms(y, m, day, 12, 0, 0).unwrap(),
        )
        .with_id(id)
    }

    fn january() -> DateRange {
        DateRange::new(d(2024, 1, 1), d(2024, 1, 31))
    }

    fn ana_and_bruno() -> ReportMap {
        let mut merged = ReportMap::new();
        merged.insert(
            "Ana".to_string(),
            ResellerReport::new(
                "u1",
                vec![
                    sale("a1", 2, 20, 2024, 1, 3),
                    sale("a2", 3, 30, 2024, 1, 15),
                    sale("a3", 5, 50, 2024, 1, 31),
                ],
            ),
        );
        merged.insert(
            "Bruno".to_string(),
            ResellerReport::new("u2", vec![sale("b1", 10, 100, 2024, 2, 2)]),
        );
        merged
    }

    #[test]
    fn resellers_without_in_window_sales_are_dropped() {
        let view = build_view(
            &ana_and_bruno(),
            &ReportFilter::new("", january()),
            &TzSpec::utc(),
        );
        assert_eq!(view.resellers.len(), 1);
        assert_eq!(view.resellers[0].name, "Ana");
        assert_eq!(view.resellers[0].total_sales, 10);
        assert_eq!(view.resellers[0].total_revenue, Decimal::new(100, 0));
        assert_eq!(view.total_sales, 10);
        assert!(view.reseller("Bruno").is_none());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(name_matches("Ana", "an"));
        assert!(name_matches("Fernanda", "an"));
        assert!(name_matches("ANA", "an"));
        assert!(!name_matches("Bruno", "an"));
        assert!(name_matches("Bruno", ""));
    }

    #[test]
    fn cancelled_sales_are_listed_but_not_counted() {
        let mut merged = ReportMap::new();
        merged.insert(
            "Carla".to_string(),
            ResellerReport::new(
                "u3",
                vec![
                    sale("c1", 4, 40, 2024, 1, 5),
                    sale("c2", 6, 60, 2024, 1, 6).cancelled(Some("admin"), None),
                ],
            ),
        );
        let view = build_view(&merged, &ReportFilter::new("", january()), &TzSpec::utc());
        let carla = view.reseller("Carla").unwrap();
        assert_eq!(carla.sales.len(), 2);
        assert_eq!(carla.total_sales, 4);
        assert_eq!(carla.total_revenue, Decimal::new(40, 0));
        let cancelled = carla
            .sales
            .iter()
            .find(|row| row.sale.sale_id.as_deref() == Some("c2"))
            .unwrap();
        assert_eq!(cancelled.status, SaleStatus::Cancelled);
        assert_eq!(cancelled.action, SaleAction::UndoCancel);
    }

    #[test]
    fn all_cancelled_reseller_still_appears_with_zero() {
        let mut merged = ReportMap::new();
        merged.insert(
            "Davi".to_string(),
            ResellerReport::new(
                "u4",
                vec![sale("d1", 1, 10, 2024, 1, 9).cancelled(None, None)],
            ),
        );
        let view = build_view(&merged, &ReportFilter::new("", january()), &TzSpec::utc());
        assert_eq!(view.resellers.len(), 1);
        assert_eq!(view.resellers[0].total_sales, 0);
        assert_eq!(view.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn ties_break_on_name() {
        let mut merged = ReportMap::new();
        for (name, id) in [("bia", "u1"), ("Alice", "u2"), ("Caio", "u3")] {
            merged.insert(
                name.to_string(),
                ResellerReport::new(id, vec![sale(id, 3, 30, 2024, 1, 10)]),
            );
        }
        merged.insert(
            "Zeca".to_string(),
            ResellerReport::new("u9", vec![sale("z", 7, 70, 2024, 1, 10)]),
        );
        let view = build_view(&merged, &ReportFilter::new("", january()), &TzSpec::utc());
        let names: Vec<&str> = view.resellers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zeca", "Alice", "bia", "Caio"]);
    }

    #[test]
    fn pager_key_falls_back_to_name() {
        let mut merged = ReportMap::new();
        merged.insert(
            "Ana".to_string(),
            ResellerReport::new("u1", vec![sale("a1", 1, 10, 2024, 1, 5)]),
        );
        merged.insert(
            "Bia".to_string(),
            ResellerReport::new("", vec![sale("b1", 1, 10, 2024, 1, 5)]),
        );
        let view = build_view(&merged, &ReportFilter::new("", january()), &TzSpec::utc());
        assert_eq!(view.reseller("Ana").unwrap().pager_key(), "u1");
        assert_eq!(view.reseller("Bia").unwrap().pager_key(), "Bia");
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut merged = ReportMap::new();
        for (name, id) in [("Bruno", "u1"), ("Álvaro", "u2"), ("Érica", "u3"), ("Zeca", "u4")] {
            merged.insert(
                name.to_string(),
                ResellerReport::new(id, vec![sale(id, 3, 30, 2024, 1, 10)]),
            );
        }
        let view = build_view(&merged, &ReportFilter::new("", january()), &TzSpec::utc());
        let names: Vec<&str> = view.resellers.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Álvaro", "Bruno", "Érica", "Zeca"]);
    }

    #[test]
    fn accent_only_differences_still_order_deterministically() {
        assert_eq!(compare_names("Ângela", "angela"), Ordering::Greater);
        assert_eq!(compare_names("Angela", "Ângela"), Ordering::Less);
        assert_eq!(compare_names("Élio", "Elisa"), Ordering::Less);
    }

    #[test]
    fn window_uses_report_timezone_days() {
        // 02:00 UTC on Feb 1 is still Jan 31 in Sao Paulo.
        let mut merged = ReportMap::new();
        merged.insert(
            "Ana".to_string(),
            ResellerReport::new(
                "u1",
                vec![SaleRecord::new(
                    "Creme",
                    1,
                    Decimal::ONE,
                    Utc.with_ymd_and_hms(2024, 2, 1, 2, 0, 0).unwrap(),
                )],
            ),
        );
        let filter = ReportFilter::new("", january());
        let sp = TzSpec::parse(Some("America/Sao_Paulo")).unwrap();
        assert_eq!(build_view(&merged, &filter, &sp).resellers.len(), 1);
        assert!(build_view(&merged, &filter, &TzSpec::utc()).resellers.is_empty());
    }

    #[test]
    fn undated_sales_never_match_a_window() {
        let mut undated = sale("x", 1, 1, 2024, 1, 1);
        undated.sale_date = None;
        let mut merged = ReportMap::new();
        merged.insert("Ana".to_string(), ResellerReport::new("u1", vec![undated]));
        let view = build_view(&merged, &ReportFilter::new("", january()), &TzSpec::utc());
        assert!(view.resellers.is_empty());
    }

    #[test]
    fn inverted_range_is_empty_and_view_is_idempotent() {
        let merged = ana_and_bruno();
        let inverted = DateRange::new(d(2024, 2, 1), d(2024, 1, 1));
        assert!(build_view(&merged, &ReportFilter::new("", inverted), &TzSpec::utc())
            .resellers
            .is_empty());

        let filter = ReportFilter::new("a", DateRange::new(d(2024, 1, 1), d(2024, 2, 29)));
        let first = build_view(&merged, &filter, &TzSpec::utc());
        let second = build_view(&merged, &filter, &TzSpec::utc());
        assert_eq!(first, second);
    }
}
