use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire;
use crate::period::TzSpec;

/// Cancellation state of a sale.
///
/// Transitions are enforced server-side: `Active -> Cancelled` via cancel,
/// `Cancelled -> Active` via undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Active,
    Cancelled,
}

/// The one mutation offered for a sale row in its current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleAction {
    Cancel,
    UndoCancel,
}

impl SaleStatus {
    pub fn available_action(self) -> SaleAction {
        match self {
            SaleStatus::Active => SaleAction::Cancel,
            SaleStatus::Cancelled => SaleAction::UndoCancel,
        }
    }
}

/// A sale as reported by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    #[serde(default, alias = "objectId", skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<String>,
    #[serde(default)]
    pub product_name: String,
    #[serde(default, deserialize_with = "wire::deserialize_quantity")]
    pub quantity_sold: i64,
    #[serde(default, deserialize_with = "wire::deserialize_amount")]
    pub total_price: Decimal,
    #[serde(default, deserialize_with = "wire::deserialize_parse_date")]
    pub sale_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "wire::deserialize_flag")]
    pub is_cancelled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl SaleRecord {
    pub fn new(
        product_name: impl Into<String>,
        quantity_sold: i64,
        total_price: Decimal,
        sale_date: DateTime<Utc>,
    ) -> Self {
        Self {
            sale_id: None,
            product_name: product_name.into(),
            quantity_sold,
            total_price,
            sale_date: Some(sale_date),
            is_cancelled: false,
            cancelled_by: None,
            cancellation_reason: None,
        }
    }

    pub fn with_id(mut self, sale_id: impl Into<String>) -> Self {
        self.sale_id = Some(sale_id.into());
        self
    }

    pub fn cancelled(mut self, by: Option<&str>, reason: Option<&str>) -> Self {
        self.is_cancelled = true;
        self.cancelled_by = by.map(str::to_string);
        self.cancellation_reason = reason.map(str::to_string);
        self
    }

    pub fn status(&self) -> SaleStatus {
        if self.is_cancelled {
            SaleStatus::Cancelled
        } else {
            SaleStatus::Active
        }
    }

    /// Cancelled sales stay listed but never count toward totals.
    pub fn counts_toward_totals(&self) -> bool {
        !self.is_cancelled
    }

    /// Calendar day of the sale in `tz`, if the sale has a date.
    pub fn sale_day(&self, tz: &TzSpec) -> Option<NaiveDate> {
        self.sale_date.map(|ts| tz.date_of(ts))
    }
}

/// Quantity and revenue summed over sales that count toward totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaleTotals {
    pub total_sales: i64,
    pub total_revenue: Decimal,
}

impl SaleTotals {
    pub fn of<'a>(sales: impl IntoIterator<Item = &'a SaleRecord>) -> Self {
        sales
            .into_iter()
            .filter(|sale| sale.counts_toward_totals())
            .fold(Self::default(), |mut acc, sale| {
                acc.total_sales += sale.quantity_sold;
                acc.total_revenue += sale.total_price;
                acc
            })
    }

    pub fn add(&mut self, other: &SaleTotals) {
        self.total_sales += other.total_sales;
        self.total_revenue += other.total_revenue;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_admin_report_sale() {
        let json = r#"{
            "saleId": "s1",
            "productName": "Perfume 50ml",
            "quantitySold": 2,
            "totalPrice": 119.8,
            "saleDate": {"__type": "Date", "iso": "2024-01-10T15:00:00.000Z"},
            "isCancelled": true,
            "cancelledBy": "admin",
            "cancellationReason": "duplicate"
        }"#;
        let sale: SaleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(sale.sale_id.as_deref(), Some("s1"));
        assert_eq!(sale.quantity_sold, 2);
        assert_eq!(sale.total_price, Decimal::new(1198, 1));
        assert_eq!(sale.status(), SaleStatus::Cancelled);
        assert_eq!(sale.status().available_action(), SaleAction::UndoCancel);
        assert_eq!(sale.cancellation_reason.as_deref(), Some("duplicate"));
    }

    #[test]
    fn object_id_is_accepted_as_sale_id() {
        let sale: SaleRecord =
            serde_json::from_str(r#"{"objectId": "abc", "productName": "Batom"}"#).unwrap();
        assert_eq!(sale.sale_id.as_deref(), Some("abc"));
        assert_eq!(sale.status(), SaleStatus::Active);
        assert_eq!(sale.sale_date, None);
    }

    #[test]
    fn totals_skip_cancelled_sales() {
        let when = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let sales = vec![
            SaleRecord::new("A", 2, Decimal::new(2000, 2), when),
            SaleRecord::new("B", 3, Decimal::new(3000, 2), when).cancelled(None, None),
            SaleRecord::new("C", 5, Decimal::new(5000, 2), when),
        ];
        let totals = SaleTotals::of(&sales);
        assert_eq!(totals.total_sales, 7);
        assert_eq!(totals.total_revenue, Decimal::new(7000, 2));
    }

    #[test]
    fn sale_day_follows_timezone() {
        let when = Utc.with_ymd_and_hms(2024, 2, 1, 1, 30, 0).unwrap();
        let sale = SaleRecord::new("A", 1, Decimal::ONE, when);
        let sp = TzSpec::parse(Some("America/Sao_Paulo")).unwrap();
        assert_eq!(
            sale.sale_day(&sp),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
        assert_eq!(
            sale.sale_day(&TzSpec::utc()),
            NaiveDate::from_ymd_opt(2024, 2, 1)
        );
    }
}
