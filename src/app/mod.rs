//! Page-level operations. Each returns a serializable output struct that
//! the CLI prints as JSON.

mod catalog;
mod config;
mod reports;
mod resellers;
mod sales;
mod session;
mod types;

use anyhow::Result;

use crate::client::BaasClient;
use crate::config::ResolvedConfig;
use crate::error::ApiError;
use crate::period::TzSpec;
use crate::session::{Session, SessionStore};

pub use catalog::{add_product, assign_stock, delete_product, list_products, update_product};
pub use config::config_output;
pub use reports::{cancel_sale, report, undo_cancel_sale, ReportRequest};
pub use resellers::{
    add_reseller, delete_contract, delete_reseller, list_contracts, rename_contract,
    reseller_roster, reseller_stock, restore_reseller, return_all_stock, return_stock,
    return_stock_batch, seller_details, update_reseller, update_seller_details, upload_contract,
};
pub use sales::{current_stock, dashboard, register_sale, sales_history};
pub use session::{clear_session, set_session, show_session};
pub use types::{
    DashboardOutput, HistoryOutput, MutationOutput, ProductOutput, ReportOutput,
    ResellerReportOutput, ReturnBatchOutput, SaleRowOutput, SessionOutput, StockOutput,
};

/// Configuration plus the client and session store built from it.
pub struct AppContext {
    pub config: ResolvedConfig,
    pub client: BaasClient,
    pub sessions: SessionStore,
}

impl AppContext {
    pub fn new(config: ResolvedConfig) -> Self {
        let client = BaasClient::from_config(&config);
        let sessions = SessionStore::new(config.session_file.clone());
        Self {
            config,
            client,
            sessions,
        }
    }

    /// Swap the client, e.g. to point at a test server.
    pub fn with_client(mut self, client: BaasClient) -> Self {
        self.client = client;
        self
    }

    /// The stored session; `NoSession` when there is none.
    pub fn session(&self) -> Result<Session, ApiError> {
        self.sessions.require()
    }

    pub fn timezone(&self) -> Result<TzSpec> {
        TzSpec::parse(self.config.reports.timezone.as_deref())
    }
}
