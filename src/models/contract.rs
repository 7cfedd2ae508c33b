use serde::{Deserialize, Serialize};

/// A reseller contract document stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub file_url: Option<String>,
}
