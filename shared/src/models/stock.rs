//! Stock ledger and reorder alert models
//!
//! The ledger holds one balance row per item; every change to a balance is
//! the result of exactly one atomic adjustment. The alert rule here is
//! edge-triggered: it fires on the mutation that crosses a threshold, never
//! on later reads while the quantity stays below it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current stock balance for an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBalance {
    pub item_id: Uuid,
    pub current_quantity: Decimal,
    pub last_updated: DateTime<Utc>,
}

/// Reason for a ledger adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    Usage,
    Restock,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Usage => "usage",
            AdjustmentReason::Restock => "restock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "usage" => Some(AdjustmentReason::Usage),
            "restock" => Some(AdjustmentReason::Restock),
            _ => None,
        }
    }
}

/// Result of a committed ledger adjustment
#[derive(Debug, Clone, Serialize)]
pub struct StockAdjustment {
    pub item_id: Uuid,
    pub reason: AdjustmentReason,
    pub delta: Decimal,
    pub previous_quantity: Decimal,
    pub new_quantity: Decimal,
    pub reorder_level: Decimal,
    pub alert: Option<AlertSeverity>,
    pub adjusted_at: DateTime<Utc>,
}

/// Severity of a reorder alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    LowStock,
    OutOfStock,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::LowStock => "low_stock",
            AlertSeverity::OutOfStock => "out_of_stock",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low_stock" => Some(AlertSeverity::LowStock),
            "out_of_stock" => Some(AlertSeverity::OutOfStock),
            _ => None,
        }
    }
}

/// A reorder alert emitted by a ledger mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: Uuid,
    pub item_id: Uuid,
    pub severity: AlertSeverity,
    /// Ledger quantity that triggered the alert
    pub quantity: Decimal,
    /// Reorder level at the time of the trigger
    pub reorder_level: Decimal,
    pub triggered_at: DateTime<Utc>,
}

/// Apply a signed delta to a balance, refusing to go negative.
///
/// Returns `None` when the resulting quantity would be below zero; the
/// caller treats that as insufficient stock and leaves the ledger unchanged.
pub fn apply_delta(current: Decimal, delta: Decimal) -> Option<Decimal> {
    let next = current + delta;
    if next < Decimal::ZERO {
        None
    } else {
        Some(next)
    }
}

/// Evaluate the edge-triggered reorder alert rule for one adjustment.
///
/// `out_of_stock` fires when the quantity reaches zero from above; otherwise
/// `low_stock` fires when the quantity crosses from above the reorder level
/// to at-or-below it. A quantity that was already at or below the level
/// before the mutation fires nothing, so repeated small usages cannot cause
/// an alert storm. Recovery above the level is silent. With the default
/// reorder level of 0 both crossings coincide and `out_of_stock` wins.
pub fn evaluate_reorder_alert(
    previous: Decimal,
    new: Decimal,
    reorder_level: Decimal,
) -> Option<AlertSeverity> {
    if new == Decimal::ZERO && previous > Decimal::ZERO {
        return Some(AlertSeverity::OutOfStock);
    }
    if new <= reorder_level && previous > reorder_level {
        return Some(AlertSeverity::LowStock);
    }
    None
}
