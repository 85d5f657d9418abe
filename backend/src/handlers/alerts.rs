//! HTTP handlers for reorder alerts

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::models::AlertEvent;

use crate::error::AppResult;
use crate::handlers::items::ledger_service;
use crate::middleware::CurrentUser;
use crate::AppState;

/// Query parameters for the alert poll
#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    pub limit: Option<i64>,
}

/// List recently triggered reorder alerts, newest first
///
/// Alerts are edge-triggered: one row per threshold crossing, so polling
/// this endpoint cannot re-announce a breach that already fired.
pub async fn list_recent_alerts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<Vec<AlertEvent>>> {
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    let service = ledger_service(&state);
    let alerts = service.list_recent_alerts(limit).await?;
    Ok(Json(alerts))
}
