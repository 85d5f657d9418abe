//! HTTP handlers for usage recording

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use shared::models::UsageRecord;
use shared::types::{PaginatedResponse, Pagination};

use crate::error::AppResult;
use crate::middleware::{require_supervisor, CurrentUser};
use crate::services::usage::{RecordUsageInput, UsageHistoryFilter};
use crate::services::UsageService;
use crate::AppState;

/// Record a consumption event against the stock ledger (supervisor)
pub async fn record_usage(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordUsageInput>,
) -> AppResult<Json<UsageRecord>> {
    require_supervisor(&current_user.0)?;
    let service = usage_service(&state);
    let record = service.record_usage(current_user.0.user_id, input).await?;
    Ok(Json(record))
}

/// Query parameters for the usage history listing
#[derive(Debug, Deserialize)]
pub struct UsageHistoryQuery {
    pub item_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List usage history, newest first, paginated
pub async fn list_usage(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<UsageHistoryQuery>,
) -> AppResult<Json<PaginatedResponse<UsageRecord>>> {
    let filter = UsageHistoryFilter {
        item_id: query.item_id,
        created_by: query.created_by,
        from: query.from,
        to: query.to,
    };
    let pagination = Pagination {
        page: query.page.unwrap_or(1).max(1),
        per_page: query.per_page.unwrap_or(20).clamp(1, 100),
    };
    let service = usage_service(&state);
    let records = service.list_usage(filter, pagination).await?;
    Ok(Json(records))
}

fn usage_service(state: &AppState) -> UsageService {
    UsageService::new(
        state.db.clone(),
        Duration::from_millis(state.config.ledger.adjust_timeout_ms),
    )
}
