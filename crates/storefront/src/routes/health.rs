//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::db::{ProductRepository, UserRepository};
use crate::state::AppState;

/// Liveness check with the catalog size.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let products = ProductRepository::new(state.db()).count().await;
    Json(json!({ "status": "OK", "products": products }))
}

/// Readiness check.
///
/// Ready once the store answers and, when demo seeding is on, the catalog
/// has been loaded.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let products = ProductRepository::new(state.db()).count().await;
    let users = UserRepository::new(state.db()).count().await;

    if state.config().seed_demo && products == 0 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "seeding" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "status": "ready", "products": products, "users": users })),
    )
}
