//! Usage recording service
//!
//! Records consumption events against the stock ledger. The ledger decrement
//! and the usage-record insert are one transaction: if the decrement is
//! refused, no record is written and the balance is unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use shared::models::{AdjustmentReason, UsageRecord};
use shared::types::{PaginatedResponse, Pagination};
use shared::validation::{validate_purpose, validate_quantity};

use crate::error::{AppError, AppResult};
use crate::services::ledger::adjust_in_tx;

/// Usage recorder service
#[derive(Clone)]
pub struct UsageService {
    db: PgPool,
    adjust_timeout: Duration,
}

/// Input for recording a usage event
#[derive(Debug, Deserialize)]
pub struct RecordUsageInput {
    pub item_id: Uuid,
    pub quantity: Decimal,
    pub usage_date: Option<NaiveDate>,
    pub purpose: String,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
}

/// Filter for usage history queries
#[derive(Debug, Default, Deserialize)]
pub struct UsageHistoryFilter {
    pub item_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl UsageService {
    /// Create a new UsageService instance
    pub fn new(db: PgPool, adjust_timeout: Duration) -> Self {
        Self { db, adjust_timeout }
    }

    /// Record a consumption event and decrement the ledger, all-or-nothing
    ///
    /// Two concurrent calls against the same item whose combined quantity
    /// exceeds the stock result in exactly one success; the conditional
    /// update inside the transaction refuses the second decrement.
    pub async fn record_usage(
        &self,
        created_by: Uuid,
        input: RecordUsageInput,
    ) -> AppResult<UsageRecord> {
        validate_quantity(input.quantity).map_err(|_| AppError::InvalidQuantity {
            quantity: input.quantity,
        })?;
        validate_purpose(&input.purpose).map_err(|_| AppError::MissingPurpose)?;

        let usage_date = input.usage_date.unwrap_or_else(|| Utc::now().date_naive());

        let fut = async {
            let mut tx = self.db.begin().await?;

            // InsufficientStock / NotFound propagate unchanged; the record
            // below is never written when the adjustment is refused.
            let adjustment =
                adjust_in_tx(&mut tx, input.item_id, -input.quantity, AdjustmentReason::Usage)
                    .await?;

            let row = sqlx::query_as::<_, (Uuid, DateTime<Utc>)>(
                r#"
                INSERT INTO usage_records (
                    item_id, quantity, usage_date, purpose, assigned_to, notes,
                    previous_quantity, new_quantity, created_by
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING id, created_at
                "#,
            )
            .bind(input.item_id)
            .bind(input.quantity)
            .bind(usage_date)
            .bind(&input.purpose)
            .bind(&input.assigned_to)
            .bind(&input.notes)
            .bind(adjustment.previous_quantity)
            .bind(adjustment.new_quantity)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;

            Ok(UsageRecord {
                id: row.0,
                item_id: input.item_id,
                quantity: input.quantity,
                usage_date,
                purpose: input.purpose,
                assigned_to: input.assigned_to,
                notes: input.notes,
                previous_quantity: adjustment.previous_quantity,
                new_quantity: adjustment.new_quantity,
                created_by,
                created_at: row.1,
            })
        };

        match tokio::time::timeout(self.adjust_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Busy),
        }
    }

    /// List usage history, newest first, paginated
    pub async fn list_usage(
        &self,
        filter: UsageHistoryFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<UsageRecord>> {
        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM usage_records
            WHERE ($1::uuid IS NULL OR item_id = $1)
              AND ($2::uuid IS NULL OR created_by = $2)
              AND ($3::date IS NULL OR usage_date >= $3)
              AND ($4::date IS NULL OR usage_date <= $4)
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.created_by)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, UsageRow>(
            r#"
            SELECT id, item_id, quantity, usage_date, purpose, assigned_to, notes,
                   previous_quantity, new_quantity, created_by, created_at
            FROM usage_records
            WHERE ($1::uuid IS NULL OR item_id = $1)
              AND ($2::uuid IS NULL OR created_by = $2)
              AND ($3::date IS NULL OR usage_date >= $3)
              AND ($4::date IS NULL OR usage_date <= $4)
            ORDER BY usage_date DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.created_by)
        .bind(filter.from)
        .bind(filter.to)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(UsageRecord::from).collect(),
            pagination: pagination.meta(total_items as u64),
        })
    }
}

/// Row for usage record queries
#[derive(Debug, sqlx::FromRow)]
struct UsageRow {
    id: Uuid,
    item_id: Uuid,
    quantity: Decimal,
    usage_date: NaiveDate,
    purpose: String,
    assigned_to: Option<String>,
    notes: Option<String>,
    previous_quantity: Decimal,
    new_quantity: Decimal,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<UsageRow> for UsageRecord {
    fn from(r: UsageRow) -> Self {
        UsageRecord {
            id: r.id,
            item_id: r.item_id,
            quantity: r.quantity,
            usage_date: r.usage_date,
            purpose: r.purpose,
            assigned_to: r.assigned_to,
            notes: r.notes,
            previous_quantity: r.previous_quantity,
            new_quantity: r.new_quantity,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}
