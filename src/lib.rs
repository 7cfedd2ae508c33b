pub mod api;
pub mod app;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod models;
pub mod period;
pub mod report;
pub mod session;
