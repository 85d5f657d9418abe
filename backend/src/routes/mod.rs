//! Route definitions for the Farm Inventory Management Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - item catalog and balances
        .nest("/items", item_routes())
        // Protected routes - usage recording
        .nest("/usage", usage_routes())
        // Protected routes - stock request workflow
        .nest("/requests", request_routes())
        // Protected routes - reorder alerts
        .nest("/alerts", alert_routes())
}

/// Item catalog routes (protected)
fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items).post(handlers::create_item))
        .route(
            "/:item_id",
            get(handlers::get_item).put(handlers::update_item),
        )
        .route("/:item_id/balance", get(handlers::get_item_balance))
        .route("/:item_id/restock", post(handlers::restock_item))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Usage recording routes (protected)
fn usage_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_usage).post(handlers::record_usage))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock request workflow routes (protected)
fn request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_requests).post(handlers::submit_request),
        )
        .route("/:request_id", get(handlers::get_request))
        .route("/:request_id/decide", post(handlers::decide_request))
        .route("/:request_id/fulfill", post(handlers::fulfill_request))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reorder alert routes (protected)
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/recent", get(handlers::list_recent_alerts))
        .route_layer(middleware::from_fn(auth_middleware))
}
