//! Usage record models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable record of stock consumption
///
/// Append-only: every record is paired 1:1 with a committed ledger decrement
/// and is never edited or deleted. The pre/post quantities are captured so
/// the audit trail can show "reduced from X to Y" without re-deriving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: Uuid,
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub usage_date: NaiveDate,
    pub purpose: String,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub previous_quantity: Decimal,
    pub new_quantity: Decimal,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
