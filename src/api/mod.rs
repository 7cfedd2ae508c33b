//! Typed wrappers for each backend function.
//!
//! Each submodule adds methods to [`BaasClient`](crate::client::BaasClient)
//! for one area of the dashboard.

mod contracts;
mod products;
mod reports;
mod resellers;
mod sales;
mod stock;

pub use reports::MonthBucket;
pub use stock::{ReturnLine, ReturnOutcome};

/// Wire names of the backend functions.
pub mod functions {
    pub const GET_CURRENT_STOCK: &str = "get-current-stock";
    pub const ADD_SALE: &str = "add-sale";
    pub const LIST_SALES_BY_USER: &str = "list-sales-by-user";
    pub const GET_ALL_SALES: &str = "get-all-sales";
    pub const CANCEL_SALE: &str = "cancel-sale";
    pub const UNDO_CANCEL_SALE: &str = "undo-cancel-sale";

    pub const LIST_ACTIVE_PRODUCTS: &str = "list-active-products";
    pub const ADD_PRODUCT: &str = "add-product";
    pub const UPDATE_PRODUCT: &str = "update-product";
    pub const SOFT_DELETE_PRODUCT: &str = "soft-delete-product";
    pub const ADD_STOCK: &str = "add-stock";

    pub const GET_RESELLER_STOCK: &str = "get-reseller-stock";
    pub const RETURN_STOCK: &str = "return-stock";

    pub const LIST_RESELLERS: &str = "list-resellers";
    pub const RESELLERS_SUMMARY: &str = "get-resellers-summarys";
    pub const SIGNUP: &str = "signup";
    pub const UPDATE_USER: &str = "update-user";
    pub const SOFT_DELETE_USER: &str = "soft-delete-user";
    pub const RESTORE_USER: &str = "restore-user";
    pub const GET_SELLER_DETAILS: &str = "get-seller-details";
    pub const UPDATE_SELLER_DETAILS: &str = "update-seller-details";

    pub const GET_ADMIN_REPORTS: &str = "get-admin-reports";

    pub const GET_SELLER_CONTRACTS: &str = "get-seller-contracts";
    pub const UPLOAD_SELLER_CONTRACT: &str = "upload-seller-contract";
    pub const UPDATE_SELLER_CONTRACT: &str = "update-seller-contract";
    pub const DELETE_SELLER_CONTRACT: &str = "delete-seller-contract";
}

/// Reject blank identifiers before dispatch.
pub(crate) fn require_id(label: &str, value: &str) -> Result<(), crate::error::ApiError> {
    if value.trim().is_empty() {
        return Err(crate::error::ApiError::invalid(format!("{label} is required")));
    }
    Ok(())
}
