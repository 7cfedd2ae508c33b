use serde::{Deserialize, Serialize};

use super::wire;

/// A reseller account as listed by `list-resellers` or
/// `get-resellers-summarys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reseller {
    #[serde(default, alias = "objectId")]
    pub reseller_id: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "wire::deserialize_flag")]
    pub is_deleted: bool,
}

/// Fields for `signup` / `update-user`.
#[derive(Debug, Clone, Serialize)]
pub struct ResellerDraft {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

/// Contact details shown on the seller page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}
