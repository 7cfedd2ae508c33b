mod contract;
mod product;
mod report;
mod reseller;
mod sale;
pub mod wire;

pub use contract::Contract;
pub use product::{Product, ProductDraft, StockItem};
pub use report::{ReportMap, ResellerReport, SalesHistoryPayload};
pub use reseller::{Reseller, ResellerDraft, SellerDetails};
pub use sale::{SaleAction, SaleRecord, SaleStatus, SaleTotals};
