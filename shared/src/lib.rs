//! Shared types and models for the Farm Inventory Management Platform
//!
//! This crate contains the domain types shared between the backend and any
//! other components of the system: the item catalog, the stock ledger, usage
//! records, the stock request workflow state machine, and the reorder alert
//! rule. Everything here is pure logic with no I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
