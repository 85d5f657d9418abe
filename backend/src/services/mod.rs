//! Business logic services for the Farm Inventory Management Platform

pub mod catalog;
pub mod ledger;
pub mod request;
pub mod usage;

pub use catalog::ItemCatalogService;
pub use ledger::StockLedgerService;
pub use request::StockRequestService;
pub use usage::UsageService;
