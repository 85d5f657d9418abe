//! Item catalog models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A consumable stock item in the catalog
///
/// Threshold invariant: `reorder_level >= 0` and `maximum_level`, when set,
/// `>= reorder_level`. An item created without a reorder level gets 0, which
/// makes low-stock and out-of-stock alerts coincide for that item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub category_id: Option<Uuid>,
    pub unit: UnitOfMeasure,
    pub unit_cost: Option<Decimal>,
    pub reorder_level: Decimal,
    pub maximum_level: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub supplier: Option<String>,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Item lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Inactive,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ItemStatus::Active),
            "inactive" => Some(ItemStatus::Inactive),
            _ => None,
        }
    }
}

/// Units of measure for farm consumables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOfMeasure {
    Kilogram,
    Gram,
    Liter,
    Milliliter,
    Bag,
    Bottle,
    Piece,
}

impl UnitOfMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Kilogram => "kilogram",
            UnitOfMeasure::Gram => "gram",
            UnitOfMeasure::Liter => "liter",
            UnitOfMeasure::Milliliter => "milliliter",
            UnitOfMeasure::Bag => "bag",
            UnitOfMeasure::Bottle => "bottle",
            UnitOfMeasure::Piece => "piece",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "kilogram" => Some(UnitOfMeasure::Kilogram),
            "gram" => Some(UnitOfMeasure::Gram),
            "liter" => Some(UnitOfMeasure::Liter),
            "milliliter" => Some(UnitOfMeasure::Milliliter),
            "bag" => Some(UnitOfMeasure::Bag),
            "bottle" => Some(UnitOfMeasure::Bottle),
            "piece" => Some(UnitOfMeasure::Piece),
            _ => None,
        }
    }
}

/// Stock-level filter for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    /// Quantity at or below the reorder level
    Low,
    /// Quantity is exactly zero
    Out,
    /// Expiry date within the next 30 days
    Expiring,
}

impl StockFilter {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(StockFilter::Low),
            "out" => Some(StockFilter::Out),
            "expiring" => Some(StockFilter::Expiring),
            _ => None,
        }
    }
}
