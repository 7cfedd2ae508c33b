#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, TimeZone, Utc};
use reqwest::StatusCode;
use resellerboard::error::ApiError;
use resellerboard::models::{ReportMap, ResellerReport, SaleRecord};
use resellerboard::report::{MonthBucket, ReportSource};
use resellerboard::session::Session;
use rust_decimal::Decimal;
use tokio::sync::Notify;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn session() -> Session {
    Session::new("r:test-token").with_fullname("Admin")
}

/// A sale at noon UTC on the given day, priced at 10 per unit.
pub fn sale(id: &str, qty: i64, y: i32, m: u32, d: u32) -> SaleRecord {
    SaleRecord::new(
        "Creme",
        qty,
        Decimal::new(qty * 10, 0),
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
    )
    .with_id(id)
}

fn rejected(function: &str, message: &str) -> ApiError {
    ApiError::Function {
        function: function.to_string(),
        status: StatusCode::BAD_REQUEST,
        code: Some(141),
        message: message.to_string(),
    }
}

/// In-memory report backend. Sales are bucketed by their UTC month and
/// cancellations flip the stored flag, as the real server does.
#[derive(Default)]
pub struct MemorySource {
    reports: Mutex<HashMap<MonthBucket, ReportMap>>,
    failing: Mutex<HashSet<MonthBucket>>,
    gates: Mutex<HashMap<MonthBucket, Arc<Notify>>>,
    fetched: Mutex<Vec<MonthBucket>>,
    reject_mutations: Mutex<bool>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sale(&self, reseller: &str, reseller_id: &str, sale: SaleRecord) {
        let when = sale.sale_date.expect("test sales carry a date");
        let bucket = MonthBucket::new(when.year(), when.month());
        let mut reports = self.reports.lock().unwrap();
        reports
            .entry(bucket)
            .or_default()
            .entry(reseller.to_string())
            .or_insert_with(|| ResellerReport::new(reseller_id, Vec::new()))
            .sales_details
            .push(sale);
    }

    pub fn fail_bucket(&self, bucket: MonthBucket) {
        self.failing.lock().unwrap().insert(bucket);
    }

    pub fn heal_bucket(&self, bucket: MonthBucket) {
        self.failing.lock().unwrap().remove(&bucket);
    }

    /// Hold fetches of `bucket` until the returned handle is notified.
    pub fn gate(&self, bucket: MonthBucket) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(bucket, notify.clone());
        notify
    }

    pub fn reject_mutations(&self, reject: bool) {
        *self.reject_mutations.lock().unwrap() = reject;
    }

    /// Buckets fetched so far, in call order.
    pub fn fetched(&self) -> Vec<MonthBucket> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }

    fn set_cancelled(
        &self,
        function: &str,
        sale_id: &str,
        cancelled: bool,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        if *self.reject_mutations.lock().unwrap() {
            return Err(rejected(function, "mutation rejected"));
        }
        let mut reports = self.reports.lock().unwrap();
        let sale = reports
            .values_mut()
            .flat_map(|bucket| bucket.values_mut())
            .flat_map(|report| report.sales_details.iter_mut())
            .find(|sale| sale.sale_id.as_deref() == Some(sale_id))
            .ok_or_else(|| rejected(function, "sale not found"))?;
        if sale.is_cancelled == cancelled {
            return Err(rejected(function, "sale is not in the expected state"));
        }
        sale.is_cancelled = cancelled;
        sale.cancelled_by = cancelled.then(|| "admin".to_string());
        sale.cancellation_reason = if cancelled {
            reason.map(str::to_string)
        } else {
            None
        };
        Ok(())
    }
}

#[async_trait]
impl ReportSource for MemorySource {
    async fn monthly_report(
        &self,
        _session: &Session,
        bucket: MonthBucket,
    ) -> Result<ReportMap, ApiError> {
        self.fetched.lock().unwrap().push(bucket);
        let gate = self.gates.lock().unwrap().get(&bucket).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&bucket) {
            return Err(ApiError::Function {
                function: "get-admin-reports".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: None,
                message: format!("bucket {bucket} unavailable"),
            });
        }
        Ok(self
            .reports
            .lock()
            .unwrap()
            .get(&bucket)
            .cloned()
            .unwrap_or_default())
    }

    async fn cancel_sale(
        &self,
        _session: &Session,
        sale_id: &str,
        reason: Option<&str>,
    ) -> Result<(), ApiError> {
        self.set_cancelled("cancel-sale", sale_id, true, reason)
    }

    async fn undo_cancel_sale(&self, _session: &Session, sale_id: &str) -> Result<(), ApiError> {
        self.set_cancelled("undo-cancel-sale", sale_id, false, None)
    }
}
