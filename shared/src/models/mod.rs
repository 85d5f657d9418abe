//! Domain models for the Farm Inventory Management Platform

mod item;
mod request;
mod stock;
mod usage;
mod user;

pub use item::*;
pub use request::*;
pub use stock::*;
pub use usage::*;
pub use user::*;
