use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{wire, SaleRecord};

/// Sales attributed to one reseller within a fetched bucket (or, after a
/// merge, across all fetched buckets).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellerReport {
    #[serde(default)]
    pub reseller_id: String,
    #[serde(default)]
    pub sales_details: Vec<SaleRecord>,
    /// Server-computed total, present on some report variants.
    #[serde(
        default,
        deserialize_with = "wire::deserialize_optional_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_sales: Option<i64>,
}

impl ResellerReport {
    pub fn new(reseller_id: impl Into<String>, sales_details: Vec<SaleRecord>) -> Self {
        Self {
            reseller_id: reseller_id.into(),
            sales_details,
            total_sales: None,
        }
    }
}

/// Reseller display name -> report. The name is the grouping key.
pub type ReportMap = HashMap<String, ResellerReport>;

/// Result of `get-all-sales`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHistoryPayload {
    #[serde(default)]
    pub sales_details: Vec<SaleRecord>,
}
