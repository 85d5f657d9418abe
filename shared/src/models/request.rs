//! Stock request workflow models
//!
//! A replenishment request moves through an explicit state machine:
//! `pending -> approved | rejected` and `approved -> fulfilled`. Rejected
//! and fulfilled are terminal. Any transition not in the table is invalid,
//! and no transition may skip a state.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workflow state of a stock request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Fulfilled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Fulfilled => "fulfilled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            "fulfilled" => Some(RequestStatus::Fulfilled),
            _ => None,
        }
    }

    /// The complete transition table for the workflow.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
                | (RequestStatus::Approved, RequestStatus::Fulfilled)
        )
    }

    /// Terminal states accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Fulfilled)
    }
}

/// Priority assigned by the requesting supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl RequestPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestPriority::Low => "low",
            RequestPriority::Medium => "medium",
            RequestPriority::High => "high",
            RequestPriority::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "low" => Some(RequestPriority::Low),
            "medium" => Some(RequestPriority::Medium),
            "high" => Some(RequestPriority::High),
            "urgent" => Some(RequestPriority::Urgent),
            _ => None,
        }
    }
}

/// A supervisor-submitted stock replenishment request
///
/// Requests are retained for audit and never deleted. `approved_by` /
/// `approved_at` are set only on approval; `fulfilled_by` / `fulfilled_at`
/// only when the restock lands in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRequest {
    pub id: Uuid,
    pub item_id: Uuid,
    pub requested_by: Uuid,
    pub quantity: Decimal,
    pub purpose: String,
    pub priority: RequestPriority,
    pub status: RequestStatus,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub needed_by: Option<NaiveDate>,
    pub requested_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub fulfilled_by: Option<Uuid>,
    pub fulfilled_at: Option<DateTime<Utc>>,
}
