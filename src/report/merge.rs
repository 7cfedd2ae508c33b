use std::collections::hash_map::Entry;

use crate::models::ReportMap;

/// Combine per-bucket mappings into one, keyed by reseller name.
///
/// Sales lists for the same name are concatenated without de-duplication;
/// the backend never returns one sale in two month buckets. Concatenation
/// order follows bucket order, totals do not depend on it.
pub fn merge_reports<I>(buckets: I) -> ReportMap
where
    I: IntoIterator<Item = ReportMap>,
{
    let mut merged = ReportMap::new();
    for bucket in buckets {
        for (name, report) in bucket {
            match merged.entry(name) {
                Entry::Occupied(mut entry) => {
                    let existing = entry.get_mut();
                    if existing.reseller_id.is_empty() {
                        existing.reseller_id = report.reseller_id;
                    }
                    existing.total_sales = match (existing.total_sales, report.total_sales) {
                        (Some(a), Some(b)) => Some(a + b),
                        _ => None,
                    };
                    existing.sales_details.extend(report.sales_details);
                }
                Entry::Vacant(entry) => {
                    entry.insert(report);
                }
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResellerReport, SaleRecord};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn sales(month: u32, count: usize) -> Vec<SaleRecord> {
        (0..count)
            .map(|i| {
                SaleRecord::new(
                    "Creme",
                    1,
                    Decimal::TEN,
                    Utc.with_ymd_and_hms(2024, month, 1 + i as u32, 12, 0, 0).unwrap(),
                )
                .with_id(format!("{month}-{i}"))
            })
            .collect()
    }

    fn bucket(entries: &[(&str, &str, Vec<SaleRecord>)]) -> ReportMap {
        entries
            .iter()
            .map(|(name, id, sales)| {
                (name.to_string(), ResellerReport::new(*id, sales.clone()))
            })
            .collect()
    }

    #[test]
    fn same_reseller_across_months_is_concatenated() {
        let jan = bucket(&[("Carla", "u3", sales(1, 2))]);
        let feb = bucket(&[("Carla", "u3", sales(2, 3))]);

        let merged = merge_reports([jan, feb]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["Carla"].sales_details.len(), 5);
        assert_eq!(merged["Carla"].reseller_id, "u3");
    }

    #[test]
    fn counts_equal_sum_of_bucket_counts() {
        let buckets = vec![
            bucket(&[("Ana", "u1", sales(1, 3)), ("Bruno", "u2", sales(1, 1))]),
            bucket(&[("Ana", "u1", sales(2, 0))]),
            bucket(&[("Bruno", "u2", sales(3, 4)), ("Carla", "u3", sales(3, 2))]),
        ];
        let mut expected = std::collections::HashMap::new();
        for b in &buckets {
            for (name, report) in b {
                *expected.entry(name.clone()).or_insert(0usize) += report.sales_details.len();
            }
        }

        let merged = merge_reports(buckets);
        assert_eq!(merged.len(), expected.len());
        for (name, count) in expected {
            assert_eq!(merged[&name].sales_details.len(), count, "{name}");
        }
    }

    #[test]
    fn merge_order_does_not_change_contents() {
        let a = bucket(&[("Ana", "u1", sales(1, 2))]);
        let b = bucket(&[("Ana", "u1", sales(2, 1)), ("Bruno", "u2", sales(2, 1))]);

        let forward = merge_reports([a.clone(), b.clone()]);
        let backward = merge_reports([b, a]);
        for (name, report) in &forward {
            let mut x: Vec<_> = report.sales_details.iter().map(|s| s.sale_id.clone()).collect();
            let mut y: Vec<_> = backward[name]
                .sales_details
                .iter()
                .map(|s| s.sale_id.clone())
                .collect();
            x.sort();
            y.sort();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn empty_input_gives_empty_mapping() {
        assert!(merge_reports(Vec::<ReportMap>::new()).is_empty());
    }
}
