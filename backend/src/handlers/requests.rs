//! HTTP handlers for the stock request workflow

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::time::Duration;
use uuid::Uuid;

use shared::models::StockRequest;

use crate::error::AppResult;
use crate::middleware::{require_admin, require_supervisor, CurrentUser};
use crate::services::request::{DecideRequestInput, RequestFilter, SubmitRequestInput};
use crate::services::StockRequestService;
use crate::AppState;

/// Submit a stock replenishment request (supervisor)
pub async fn submit_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SubmitRequestInput>,
) -> AppResult<Json<StockRequest>> {
    require_supervisor(&current_user.0)?;
    let service = request_service(&state);
    let request = service.submit(current_user.0.user_id, input).await?;
    Ok(Json(request))
}

/// List stock requests, optionally filtered by requester or status
pub async fn list_requests(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<RequestFilter>,
) -> AppResult<Json<Vec<StockRequest>>> {
    let service = request_service(&state);
    let requests = service.list_requests(filter).await?;
    Ok(Json(requests))
}

/// Get a stock request by id
pub async fn get_request(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<StockRequest>> {
    let service = request_service(&state);
    let request = service.get_request(request_id).await?;
    Ok(Json(request))
}

/// Approve or reject a pending request (admin)
pub async fn decide_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(input): Json<DecideRequestInput>,
) -> AppResult<Json<StockRequest>> {
    require_admin(&current_user.0)?;
    let service = request_service(&state);
    let request = service
        .decide(request_id, current_user.0.user_id, input)
        .await?;
    Ok(Json(request))
}

/// Fulfill an approved request, restocking the ledger (admin)
pub async fn fulfill_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<StockRequest>> {
    require_admin(&current_user.0)?;
    let service = request_service(&state);
    let request = service.fulfill(request_id, current_user.0.user_id).await?;
    Ok(Json(request))
}

fn request_service(state: &AppState) -> StockRequestService {
    StockRequestService::new(
        state.db.clone(),
        Duration::from_millis(state.config.ledger.adjust_timeout_ms),
    )
}
