use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default, deserialize_with = "wire::deserialize_amount")]
    pub price: Decimal,
    #[serde(default, deserialize_with = "wire::deserialize_quantity")]
    pub stock: i64,
}

/// Fields sent when creating or editing a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub product_name: String,
    pub stock: i64,
    pub price: Decimal,
}

/// A stock line held by a reseller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(
        default,
        deserialize_with = "wire::deserialize_optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "wire::deserialize_quantity")]
    pub quantity: i64,
}
