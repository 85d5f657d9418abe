//! Stock ledger service: the single serialization point for quantity changes
//!
//! Every mutation of a stock balance goes through [`adjust_in_tx`], a single
//! conditional UPDATE that applies the delta only when the resulting quantity
//! stays non-negative. Postgres row locking orders concurrent adjustments on
//! the same item; adjustments on different items do not block each other.
//! Reorder alert evaluation happens inside the same transaction as the
//! ledger write, so either both commit or neither does.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Duration;
use uuid::Uuid;

use shared::models::{
    evaluate_reorder_alert, AdjustmentReason, AlertEvent, AlertSeverity, StockAdjustment,
    StockBalance,
};

use crate::error::{AppError, AppResult};

/// Stock ledger service for atomic balance adjustments
#[derive(Clone)]
pub struct StockLedgerService {
    db: PgPool,
    adjust_timeout: Duration,
}

impl StockLedgerService {
    /// Create a new StockLedgerService instance
    pub fn new(db: PgPool, adjust_timeout: Duration) -> Self {
        Self { db, adjust_timeout }
    }

    /// Apply a signed delta to an item's balance in its own transaction
    ///
    /// This is the entry point for standalone restocks. Usage recording and
    /// request fulfillment call [`adjust_in_tx`] instead so the adjustment
    /// commits together with their own writes.
    pub async fn adjust(
        &self,
        item_id: Uuid,
        delta: Decimal,
        reason: AdjustmentReason,
    ) -> AppResult<StockAdjustment> {
        let fut = async {
            let mut tx = self.db.begin().await?;
            let adjustment = adjust_in_tx(&mut tx, item_id, delta, reason).await?;
            tx.commit().await?;
            Ok(adjustment)
        };

        match tokio::time::timeout(self.adjust_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Busy),
        }
    }

    /// Get the current balance for an item
    pub async fn get_balance(&self, item_id: Uuid) -> AppResult<StockBalance> {
        let row = sqlx::query_as::<_, (Decimal, DateTime<Utc>)>(
            r#"
            SELECT b.current_quantity, b.last_updated
            FROM stock_balances b
            JOIN items i ON i.id = b.item_id
            WHERE b.item_id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(StockBalance {
            item_id,
            current_quantity: row.0,
            last_updated: row.1,
        })
    }

    /// List recently emitted reorder alerts, newest first
    pub async fn list_recent_alerts(&self, limit: i64) -> AppResult<Vec<AlertEvent>> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, String, Decimal, Decimal, DateTime<Utc>)>(
            r#"
            SELECT id, item_id, severity, quantity, reorder_level, triggered_at
            FROM stock_alerts
            ORDER BY triggered_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|r| {
                let severity = AlertSeverity::from_str(&r.2).ok_or_else(|| {
                    AppError::InternalError(anyhow::anyhow!("unknown alert severity: {}", r.2))
                })?;
                Ok(AlertEvent {
                    id: r.0,
                    item_id: r.1,
                    severity,
                    quantity: r.3,
                    reorder_level: r.4,
                    triggered_at: r.5,
                })
            })
            .collect()
    }
}

/// Apply a signed delta to an item's balance within the caller's transaction
///
/// Fails with `InsufficientStock` when a decrement would drive the balance
/// negative (the ledger is left unchanged) and with `NotFound` when the item
/// does not exist or is inactive. On success the new quantity is handed to
/// the reorder alert rule and any triggered alert is recorded in the same
/// transaction.
pub(crate) async fn adjust_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
    delta: Decimal,
    reason: AdjustmentReason,
) -> AppResult<StockAdjustment> {
    // Single atomic conditional update: the check and the write are one
    // statement, so two concurrent over-drawing decrements cannot both pass.
    let row = sqlx::query_as::<_, (Decimal, Decimal, DateTime<Utc>)>(
        r#"
        UPDATE stock_balances b
        SET current_quantity = b.current_quantity + $2, last_updated = NOW()
        FROM items i
        WHERE b.item_id = $1
          AND i.id = b.item_id
          AND i.status = 'active'
          AND b.current_quantity + $2 >= 0
        RETURNING b.current_quantity, i.reorder_level, b.last_updated
        "#,
    )
    .bind(item_id)
    .bind(delta)
    .fetch_optional(&mut **tx)
    .await?;

    let (new_quantity, reorder_level, adjusted_at) = match row {
        Some(row) => row,
        None => {
            // Distinguish a missing or inactive item from an insufficient
            // balance; the current quantity is reported back to the caller.
            let current = sqlx::query_scalar::<_, Decimal>(
                r#"
                SELECT b.current_quantity
                FROM stock_balances b
                JOIN items i ON i.id = b.item_id
                WHERE b.item_id = $1 AND i.status = 'active'
                "#,
            )
            .bind(item_id)
            .fetch_optional(&mut **tx)
            .await?;

            return match current {
                Some(current) => Err(AppError::InsufficientStock {
                    current,
                    requested: -delta,
                }),
                None => Err(AppError::NotFound("Item".to_string())),
            };
        }
    };

    let previous_quantity = new_quantity - delta;
    let alert = evaluate_reorder_alert(previous_quantity, new_quantity, reorder_level);

    if let Some(severity) = alert {
        record_alert(tx, item_id, severity, new_quantity, reorder_level).await?;
    }

    tracing::info!(
        item_id = %item_id,
        reason = reason.as_str(),
        %delta,
        %previous_quantity,
        %new_quantity,
        "stock adjusted"
    );

    Ok(StockAdjustment {
        item_id,
        reason,
        delta,
        previous_quantity,
        new_quantity,
        reorder_level,
        alert,
        adjusted_at,
    })
}

/// Record a triggered reorder alert in the caller's transaction
///
/// The rule is edge-triggered, so a row lands here only on the mutation that
/// crossed the threshold; collaborators poll these rows to render banners.
async fn record_alert(
    tx: &mut Transaction<'_, Postgres>,
    item_id: Uuid,
    severity: AlertSeverity,
    quantity: Decimal,
    reorder_level: Decimal,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_alerts (item_id, severity, quantity, reorder_level)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(item_id)
    .bind(severity.as_str())
    .bind(quantity)
    .bind(reorder_level)
    .execute(&mut **tx)
    .await?;

    tracing::warn!(
        item_id = %item_id,
        severity = severity.as_str(),
        %quantity,
        %reorder_level,
        "reorder alert triggered"
    );

    Ok(())
}
