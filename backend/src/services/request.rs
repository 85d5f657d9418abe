//! Stock request workflow service
//!
//! Supervisors submit replenishment requests; administrators approve or
//! reject them; approved requests are fulfilled, which restocks the ledger.
//! Transitions are guarded by conditional updates against the current
//! status, so a second decision or fulfillment of the same request fails
//! with an invalid-transition error instead of silently succeeding.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use shared::models::{AdjustmentReason, RequestPriority, RequestStatus, StockRequest};
use shared::validation::{validate_purpose, validate_quantity};

use crate::error::{AppError, AppResult};
use crate::services::ledger::adjust_in_tx;

/// Stock request workflow service
#[derive(Clone)]
pub struct StockRequestService {
    db: PgPool,
    adjust_timeout: Duration,
}

/// Input for submitting a stock request
#[derive(Debug, Deserialize)]
pub struct SubmitRequestInput {
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub purpose: String,
    pub priority: RequestPriority,
    pub notes: Option<String>,
    pub needed_by: Option<NaiveDate>,
}

/// An administrator's decision on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDecision {
    Approve,
    Reject,
}

impl RequestDecision {
    fn target_status(&self) -> RequestStatus {
        match self {
            RequestDecision::Approve => RequestStatus::Approved,
            RequestDecision::Reject => RequestStatus::Rejected,
        }
    }

    fn action(&self) -> &'static str {
        match self {
            RequestDecision::Approve => "approve",
            RequestDecision::Reject => "reject",
        }
    }
}

/// Input for deciding a request
#[derive(Debug, Deserialize)]
pub struct DecideRequestInput {
    pub decision: RequestDecision,
    pub admin_notes: Option<String>,
}

/// Filter for request listings
#[derive(Debug, Default, Deserialize)]
pub struct RequestFilter {
    pub requester_id: Option<Uuid>,
    pub status: Option<RequestStatus>,
}

impl StockRequestService {
    /// Create a new StockRequestService instance
    pub fn new(db: PgPool, adjust_timeout: Duration) -> Self {
        Self { db, adjust_timeout }
    }

    /// Submit a replenishment request; the initial state is always pending
    pub async fn submit(
        &self,
        requested_by: Uuid,
        input: SubmitRequestInput,
    ) -> AppResult<StockRequest> {
        validate_quantity(input.quantity).map_err(|_| AppError::InvalidQuantity {
            quantity: input.quantity,
        })?;
        validate_purpose(&input.purpose).map_err(|_| AppError::MissingPurpose)?;

        let item_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)",
        )
        .bind(input.item_id)
        .fetch_one(&self.db)
        .await?;

        if !item_exists {
            return Err(AppError::NotFound("Item".to_string()));
        }

        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            INSERT INTO stock_requests (item_id, requested_by, quantity, purpose, priority, notes, needed_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, item_id, requested_by, quantity, purpose, priority, status,
                      notes, admin_notes, needed_by, requested_at,
                      approved_by, approved_at, fulfilled_by, fulfilled_at
            "#,
        )
        .bind(input.item_id)
        .bind(requested_by)
        .bind(input.quantity)
        .bind(&input.purpose)
        .bind(input.priority.as_str())
        .bind(&input.notes)
        .bind(input.needed_by)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(request_id = %row.id, item_id = %input.item_id, "stock request submitted");

        row.try_into()
    }

    /// Approve or reject a pending request
    ///
    /// Guarded by a conditional update on the current status: only a pending
    /// request can be decided, and exactly one concurrent decision wins.
    /// Approver identity and timestamp are recorded on approval only.
    pub async fn decide(
        &self,
        request_id: Uuid,
        decided_by: Uuid,
        input: DecideRequestInput,
    ) -> AppResult<StockRequest> {
        let target = input.decision.target_status();

        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            UPDATE stock_requests
            SET status = $2,
                admin_notes = COALESCE($3, admin_notes),
                approved_by = CASE WHEN $2 = 'approved' THEN $4 ELSE approved_by END,
                approved_at = CASE WHEN $2 = 'approved' THEN NOW() ELSE approved_at END
            WHERE id = $1 AND status = 'pending'
            RETURNING id, item_id, requested_by, quantity, purpose, priority, status,
                      notes, admin_notes, needed_by, requested_at,
                      approved_by, approved_at, fulfilled_by, fulfilled_at
            "#,
        )
        .bind(request_id)
        .bind(target.as_str())
        .bind(&input.admin_notes)
        .bind(decided_by)
        .fetch_optional(&self.db)
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                return Err(self
                    .transition_error(request_id, input.decision.action())
                    .await?)
            }
        };

        tracing::info!(
            request_id = %request_id,
            decision = input.decision.action(),
            decided_by = %decided_by,
            "stock request decided"
        );

        row.try_into()
    }

    /// Fulfill an approved request, restocking the ledger
    ///
    /// The status transition and the ledger increment commit as one
    /// transaction; if the increment fails (e.g. the item was deactivated)
    /// the transition rolls back and the request remains approved.
    pub async fn fulfill(&self, request_id: Uuid, fulfilled_by: Uuid) -> AppResult<StockRequest> {
        let fut = async {
            let mut tx = self.db.begin().await?;

            let row = sqlx::query_as::<_, RequestRow>(
                r#"
                UPDATE stock_requests
                SET status = 'fulfilled', fulfilled_by = $2, fulfilled_at = NOW()
                WHERE id = $1 AND status = 'approved'
                RETURNING id, item_id, requested_by, quantity, purpose, priority, status,
                          notes, admin_notes, needed_by, requested_at,
                          approved_by, approved_at, fulfilled_by, fulfilled_at
                "#,
            )
            .bind(request_id)
            .bind(fulfilled_by)
            .fetch_optional(&mut *tx)
            .await?;

            let row = match row {
                Some(row) => row,
                None => return Err(self.transition_error(request_id, "fulfill").await?),
            };

            // A failed increment aborts the transaction and the request
            // stays approved.
            adjust_in_tx(&mut tx, row.item_id, row.quantity, AdjustmentReason::Restock).await?;

            tx.commit().await?;

            tracing::info!(
                request_id = %request_id,
                item_id = %row.item_id,
                quantity = %row.quantity,
                fulfilled_by = %fulfilled_by,
                "stock request fulfilled"
            );

            row.try_into()
        };

        match tokio::time::timeout(self.adjust_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Busy),
        }
    }

    /// Get a request by id
    pub async fn get_request(&self, request_id: Uuid) -> AppResult<StockRequest> {
        let row = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, item_id, requested_by, quantity, purpose, priority, status,
                   notes, admin_notes, needed_by, requested_at,
                   approved_by, approved_at, fulfilled_by, fulfilled_at
            FROM stock_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock request".to_string()))?;

        row.try_into()
    }

    /// List requests, newest first
    pub async fn list_requests(&self, filter: RequestFilter) -> AppResult<Vec<StockRequest>> {
        let rows = sqlx::query_as::<_, RequestRow>(
            r#"
            SELECT id, item_id, requested_by, quantity, purpose, priority, status,
                   notes, admin_notes, needed_by, requested_at,
                   approved_by, approved_at, fulfilled_by, fulfilled_at
            FROM stock_requests
            WHERE ($1::uuid IS NULL OR requested_by = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY requested_at DESC
            "#,
        )
        .bind(filter.requester_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Build the error for a transition that found no matching row:
    /// either the request does not exist, or its current status refuses
    /// the attempted action.
    async fn transition_error(&self, request_id: Uuid, action: &str) -> AppResult<AppError> {
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM stock_requests WHERE id = $1",
        )
        .bind(request_id)
        .fetch_optional(&self.db)
        .await?;

        match status {
            None => Ok(AppError::NotFound("Stock request".to_string())),
            Some(s) => {
                let from = RequestStatus::from_str(&s).ok_or_else(|| {
                    AppError::InternalError(anyhow::anyhow!("unknown request status: {}", s))
                })?;
                Ok(AppError::InvalidTransition {
                    from,
                    action: action.to_string(),
                })
            }
        }
    }
}

/// Row for stock request queries
#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: Uuid,
    item_id: Uuid,
    requested_by: Uuid,
    quantity: Decimal,
    purpose: String,
    priority: String,
    status: String,
    notes: Option<String>,
    admin_notes: Option<String>,
    needed_by: Option<NaiveDate>,
    requested_at: DateTime<Utc>,
    approved_by: Option<Uuid>,
    approved_at: Option<DateTime<Utc>>,
    fulfilled_by: Option<Uuid>,
    fulfilled_at: Option<DateTime<Utc>>,
}

impl TryFrom<RequestRow> for StockRequest {
    type Error = AppError;

    fn try_from(r: RequestRow) -> Result<Self, Self::Error> {
        let priority = RequestPriority::from_str(&r.priority).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("unknown request priority: {}", r.priority))
        })?;
        let status = RequestStatus::from_str(&r.status).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("unknown request status: {}", r.status))
        })?;

        Ok(StockRequest {
            id: r.id,
            item_id: r.item_id,
            requested_by: r.requested_by,
            quantity: r.quantity,
            purpose: r.purpose,
            priority,
            status,
            notes: r.notes,
            admin_notes: r.admin_notes,
            needed_by: r.needed_by,
            requested_at: r.requested_at,
            approved_by: r.approved_by,
            approved_at: r.approved_at,
            fulfilled_by: r.fulfilled_by,
            fulfilled_at: r.fulfilled_at,
        })
    }
}
