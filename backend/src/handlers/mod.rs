//! HTTP handlers for the Farm Inventory Management Platform

pub mod alerts;
pub mod health;
pub mod items;
pub mod requests;
pub mod usage;

pub use alerts::*;
pub use health::*;
pub use items::*;
pub use requests::*;
pub use usage::*;
