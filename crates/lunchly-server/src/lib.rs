//! Lunchly HTTP server library logic.

pub mod api;
pub mod api_customers;
pub mod api_reservations;
pub mod config;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Json, Router};
use lunchly_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Maximum request body size (64 KiB). Every request body is a small JSON form.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/customers",
            get(api_customers::list_customers_handler)
                .post(api_customers::create_customer_handler),
        )
        .route(
            "/api/customers/top-ten",
            get(api_customers::top_ten_handler),
        )
        .route(
            "/api/customers/{id}",
            get(api_customers::get_customer_handler).put(api_customers::update_customer_handler),
        )
        .route(
            "/api/customers/{id}/reservations",
            get(api_reservations::list_reservations_handler)
                .post(api_reservations::create_reservation_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
