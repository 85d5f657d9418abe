//! HTTP handlers for the item catalog and stock balances

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use shared::models::{AdjustmentReason, StockAdjustment, StockBalance};

use crate::error::AppResult;
use crate::middleware::{require_admin, CurrentUser};
use crate::services::catalog::{CreateItemInput, ItemFilter, ItemWithStock, UpdateItemInput};
use crate::services::{ItemCatalogService, StockLedgerService};
use crate::AppState;

/// List active catalog items, with optional search/category/stock filters
pub async fn list_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ItemFilter>,
) -> AppResult<Json<Vec<ItemWithStock>>> {
    let service = ItemCatalogService::new(state.db);
    let items = service.list_active_items(filter).await?;
    Ok(Json(items))
}

/// Get a catalog item with its current balance
pub async fn get_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemWithStock>> {
    let service = ItemCatalogService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Create a catalog item (admin)
pub async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<ItemWithStock>> {
    require_admin(&current_user.0)?;
    let service = ItemCatalogService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Update catalog metadata and thresholds (admin)
pub async fn update_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<ItemWithStock>> {
    require_admin(&current_user.0)?;
    let service = ItemCatalogService::new(state.db);
    let item = service.update_item(item_id, input).await?;
    Ok(Json(item))
}

/// Get the current stock balance for an item
pub async fn get_item_balance(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<StockBalance>> {
    let service = ledger_service(&state);
    let balance = service.get_balance(item_id).await?;
    Ok(Json(balance))
}

/// Input for a direct restock
#[derive(Debug, Deserialize)]
pub struct RestockInput {
    pub quantity: Decimal,
}

/// Restock an item outside the request workflow (admin)
pub async fn restock_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
    Json(input): Json<RestockInput>,
) -> AppResult<Json<StockAdjustment>> {
    require_admin(&current_user.0)?;
    shared::validation::validate_quantity(input.quantity).map_err(|_| {
        crate::error::AppError::InvalidQuantity {
            quantity: input.quantity,
        }
    })?;
    let service = ledger_service(&state);
    let adjustment = service
        .adjust(item_id, input.quantity, AdjustmentReason::Restock)
        .await?;
    Ok(Json(adjustment))
}

pub(crate) fn ledger_service(state: &AppState) -> StockLedgerService {
    StockLedgerService::new(
        state.db.clone(),
        Duration::from_millis(state.config.ledger.adjust_timeout_ms),
    )
}
