//! Item catalog service
//!
//! Administrators own the catalog; the rest of the core treats it as
//! read-only. Threshold invariants (reorder level non-negative, maximum
//! level at or above it) are enforced here before any write is accepted.
//! Every item gets a companion stock balance row starting at zero; the
//! balance itself is only ever changed through the stock ledger.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::{Item, ItemStatus, StockFilter, UnitOfMeasure};
use shared::validation::{validate_sku, validate_thresholds};

use crate::error::{AppError, AppResult};

/// Item catalog service
#[derive(Clone)]
pub struct ItemCatalogService {
    db: PgPool,
}

/// Input for creating a catalog item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub sku: String,
    pub category_id: Option<Uuid>,
    pub unit: UnitOfMeasure,
    pub unit_cost: Option<Decimal>,
    /// Defaults to 0 when omitted; low-stock and out-of-stock alerts then
    /// coincide for this item
    pub reorder_level: Option<Decimal>,
    pub maximum_level: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub supplier: Option<String>,
}

/// Input for updating catalog metadata and thresholds
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub category_id: Option<Uuid>,
    pub unit_cost: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
    pub maximum_level: Option<Decimal>,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
    pub supplier: Option<String>,
    pub status: Option<ItemStatus>,
}

/// Filter for catalog listings
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub stock_filter: Option<StockFilter>,
}

/// Catalog item together with its current balance
#[derive(Debug, Clone, Serialize)]
pub struct ItemWithStock {
    #[serde(flatten)]
    pub item: Item,
    pub current_quantity: Decimal,
}

impl ItemCatalogService {
    /// Create a new ItemCatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get an item by id
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<ItemWithStock> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE i.id = $1",
            ITEM_SELECT
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        row.try_into()
    }

    /// List active items, optionally filtered by search text, category, or
    /// stock level
    pub async fn list_active_items(&self, filter: ItemFilter) -> AppResult<Vec<ItemWithStock>> {
        // The stock filter clauses are fixed strings chosen by enum variant.
        let stock_clause = match filter.stock_filter {
            Some(StockFilter::Low) => " AND b.current_quantity <= i.reorder_level",
            Some(StockFilter::Out) => " AND b.current_quantity = 0",
            Some(StockFilter::Expiring) => {
                " AND i.expiry_date IS NOT NULL AND i.expiry_date <= CURRENT_DATE + INTERVAL '30 days'"
            }
            None => "",
        };

        let query = format!(
            r#"{ITEM_SELECT}
            WHERE i.status = 'active'
              AND ($1::text IS NULL OR i.name ILIKE '%' || $1 || '%' OR i.sku ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR i.category_id = $2)
              {stock_clause}
            ORDER BY i.name
            "#
        );

        let rows = sqlx::query_as::<_, ItemRow>(&query)
            .bind(&filter.search)
            .bind(filter.category_id)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Create a catalog item with a zero-balance ledger row
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<ItemWithStock> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Item name cannot be empty".to_string(),
            });
        }
        validate_sku(&input.sku).map_err(|msg| AppError::Validation {
            field: "sku".to_string(),
            message: msg.to_string(),
        })?;

        // A missing reorder level is stored as 0.
        let reorder_level = input.reorder_level.unwrap_or(Decimal::ZERO);
        validate_thresholds(reorder_level, input.maximum_level).map_err(|msg| {
            AppError::Validation {
                field: "reorder_level".to_string(),
                message: msg.to_string(),
            }
        })?;

        let mut tx = self.db.begin().await?;

        let item_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO items (name, sku, category_id, unit, unit_cost, reorder_level,
                               maximum_level, expiry_date, batch_number, supplier)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.sku)
        .bind(input.category_id)
        .bind(input.unit.as_str())
        .bind(input.unit_cost)
        .bind(reorder_level)
        .bind(input.maximum_level)
        .bind(input.expiry_date)
        .bind(&input.batch_number)
        .bind(&input.supplier)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO stock_balances (item_id, current_quantity) VALUES ($1, 0)")
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(item_id = %item_id, sku = %input.sku, "catalog item created");

        self.get_item(item_id).await
    }

    /// Update catalog metadata and thresholds
    ///
    /// The threshold invariant is checked against the merged values before
    /// the write is accepted.
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<ItemWithStock> {
        let existing = self.get_item(item_id).await?.item;

        let name = input.name.unwrap_or(existing.name);
        if name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Item name cannot be empty".to_string(),
            });
        }

        let reorder_level = input.reorder_level.unwrap_or(existing.reorder_level);
        let maximum_level = input.maximum_level.or(existing.maximum_level);
        validate_thresholds(reorder_level, maximum_level).map_err(|msg| {
            AppError::Validation {
                field: "reorder_level".to_string(),
                message: msg.to_string(),
            }
        })?;

        let category_id = input.category_id.or(existing.category_id);
        let unit_cost = input.unit_cost.or(existing.unit_cost);
        let expiry_date = input.expiry_date.or(existing.expiry_date);
        let batch_number = input.batch_number.or(existing.batch_number);
        let supplier = input.supplier.or(existing.supplier);
        let status = input.status.unwrap_or(existing.status);

        sqlx::query(
            r#"
            UPDATE items
            SET name = $1, category_id = $2, unit_cost = $3, reorder_level = $4,
                maximum_level = $5, expiry_date = $6, batch_number = $7,
                supplier = $8, status = $9, updated_at = NOW()
            WHERE id = $10
            "#,
        )
        .bind(&name)
        .bind(category_id)
        .bind(unit_cost)
        .bind(reorder_level)
        .bind(maximum_level)
        .bind(expiry_date)
        .bind(&batch_number)
        .bind(&supplier)
        .bind(status.as_str())
        .bind(item_id)
        .execute(&self.db)
        .await?;

        self.get_item(item_id).await
    }
}

/// Shared SELECT for item queries, joined with the balance row
const ITEM_SELECT: &str = r#"
    SELECT i.id, i.name, i.sku, i.category_id, i.unit, i.unit_cost,
           i.reorder_level, i.maximum_level, i.expiry_date, i.batch_number,
           i.supplier, i.status, i.created_at, i.updated_at,
           b.current_quantity
    FROM items i
    JOIN stock_balances b ON b.item_id = i.id
"#;

/// Row for item queries
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    sku: String,
    category_id: Option<Uuid>,
    unit: String,
    unit_cost: Option<Decimal>,
    reorder_level: Decimal,
    maximum_level: Option<Decimal>,
    expiry_date: Option<NaiveDate>,
    batch_number: Option<String>,
    supplier: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    current_quantity: Decimal,
}

impl TryFrom<ItemRow> for ItemWithStock {
    type Error = AppError;

    fn try_from(r: ItemRow) -> Result<Self, Self::Error> {
        let unit = UnitOfMeasure::from_str(&r.unit).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("unknown unit of measure: {}", r.unit))
        })?;
        let status = ItemStatus::from_str(&r.status).ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!("unknown item status: {}", r.status))
        })?;

        Ok(ItemWithStock {
            item: Item {
                id: r.id,
                name: r.name,
                sku: r.sku,
                category_id: r.category_id,
                unit,
                unit_cost: r.unit_cost,
                reorder_level: r.reorder_level,
                maximum_level: r.maximum_level,
                expiry_date: r.expiry_date,
                batch_number: r.batch_number,
                supplier: r.supplier,
                status,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            current_quantity: r.current_quantity,
        })
    }
}
