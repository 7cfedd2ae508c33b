//! Product catalog and reseller roster projections.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use crate::models::{Product, ReportMap, Reseller, SaleTotals};
use crate::report::{compare_names, name_matches};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction '{other}' (expected asc or desc)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductSort {
    #[default]
    Name,
    Stock,
    Price,
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "stock" => Ok(Self::Stock),
            "price" => Ok(Self::Price),
            other => Err(format!(
                "unknown product sort '{other}' (expected name, stock or price)"
            )),
        }
    }
}

/// Name search then sort, over a copy of `products`.
pub fn search_products(
    products: &[Product],
    term: &str,
    sort: ProductSort,
    direction: SortDirection,
) -> Vec<Product> {
    let mut matching: Vec<Product> = products
        .iter()
        .filter(|p| name_matches(&p.product_name, term))
        .cloned()
        .collect();
    matching.sort_by(|a, b| {
        let ordering = match sort {
            ProductSort::Name => compare_names(&a.product_name, &b.product_name),
            ProductSort::Stock => a.stock.cmp(&b.stock),
            ProductSort::Price => a.price.cmp(&b.price),
        };
        direction.apply(ordering)
    });
    matching
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterSort {
    #[default]
    Name,
    Sales,
}

impl FromStr for RosterSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "sales" => Ok(Self::Sales),
            other => Err(format!("unknown roster sort '{other}' (expected name or sales)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterRow {
    pub seller_id: String,
    pub name: String,
    pub email: String,
    pub is_deleted: bool,
    pub sales_count: i64,
}

#[derive(Debug, Clone, Default)]
pub struct RosterFilter {
    pub search: String,
    /// Show only deleted resellers; otherwise only active ones.
    pub only_deleted: bool,
    pub sort: RosterSort,
    pub direction: SortDirection,
}

/// Join the roster with an all-time report keyed by reseller name.
///
/// A server-computed `totalSales` wins; otherwise the non-cancelled
/// quantity is summed. Resellers missing from the report count zero.
pub fn roster_rows(resellers: &[Reseller], report: &ReportMap) -> Vec<RosterRow> {
    resellers
        .iter()
        .map(|reseller| {
            let sales_count = report
                .get(&reseller.fullname)
                .map(|entry| {
                    entry
                        .total_sales
                        .unwrap_or_else(|| SaleTotals::of(&entry.sales_details).total_sales)
                })
                .unwrap_or(0);
            RosterRow {
                seller_id: reseller.reseller_id.clone(),
                name: reseller.fullname.clone(),
                email: reseller.email.clone(),
                is_deleted: reseller.is_deleted,
                sales_count,
            }
        })
        .collect()
}

pub fn filter_roster(rows: &[RosterRow], filter: &RosterFilter) -> Vec<RosterRow> {
    let mut kept: Vec<RosterRow> = rows
        .iter()
        .filter(|row| row.is_deleted == filter.only_deleted)
        .filter(|row| name_matches(&row.name, &filter.search))
        .cloned()
        .collect();
    kept.sort_by(|a, b| {
        let ordering = match filter.sort {
            RosterSort::Name => compare_names(&a.name, &b.name),
            RosterSort::Sales => a.sales_count.cmp(&b.sales_count),
        };
        filter.direction.apply(ordering)
    });
    kept
}
