use chrono::{Datelike, NaiveDate};

use super::MonthBucket;
use crate::period::DateRange;

/// Every calendar month touched by `[start, end]`, oldest first.
///
/// Partial months at either end are included. An inverted range
/// (`start > end`) is a caller error and yields no buckets.
pub fn plan_month_buckets(start: NaiveDate, end: NaiveDate) -> Vec<MonthBucket> {
    if start > end {
        return Vec::new();
    }

    let last = (end.year(), end.month());
    let (mut year, mut month) = (start.year(), start.month());
    let mut buckets = Vec::new();
    while (year, month) <= last {
        buckets.push(MonthBucket::new(year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    buckets
}

pub fn plan_range(range: &DateRange) -> Vec<MonthBucket> {
    plan_month_buckets(range.start, range.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_day_is_one_bucket() {
        assert_eq!(
            plan_month_buckets(d(2024, 5, 9), d(2024, 5, 9)),
            vec![MonthBucket::new(2024, 5)]
        );
    }

    #[test]
    fn partial_months_at_both_ends_are_included() {
        assert_eq!(
            plan_month_buckets(d(2024, 1, 31), d(2024, 3, 1)),
            vec![
                MonthBucket::new(2024, 1),
                MonthBucket::new(2024, 2),
                MonthBucket::new(2024, 3),
            ]
        );
    }

    #[test]
    fn crosses_year_boundary() {
        assert_eq!(
            plan_month_buckets(d(2023, 11, 15), d(2024, 2, 2)),
            vec![
                MonthBucket::new(2023, 11),
                MonthBucket::new(2023, 12),
                MonthBucket::new(2024, 1),
                MonthBucket::new(2024, 2),
            ]
        );
    }

    #[test]
    fn inverted_range_is_empty() {
        assert!(plan_month_buckets(d(2024, 3, 1), d(2024, 2, 28)).is_empty());
    }

    #[test]
    fn buckets_match_months_of_every_day_in_range() {
        let ranges = [
            (d(2023, 12, 31), d(2024, 1, 1)),
            (d(2024, 2, 28), d(2024, 3, 1)),
            (d(2022, 6, 15), d(2024, 7, 3)),
            (d(2024, 1, 1), d(2024, 12, 31)),
        ];
        for (start, end) in ranges {
            let expected: BTreeSet<MonthBucket> = start
                .iter_days()
                .take_while(|day| *day <= end)
                .map(|day| MonthBucket::new(day.year(), day.month()))
                .collect();
            let planned = plan_month_buckets(start, end);

            let unique: BTreeSet<MonthBucket> = planned.iter().copied().collect();
            assert_eq!(unique.len(), planned.len(), "duplicates for {start}..{end}");
            assert_eq!(unique, expected, "wrong months for {start}..{end}");
            assert!(planned.windows(2).all(|w| w[0] < w[1]), "not ascending");
        }
    }
}
