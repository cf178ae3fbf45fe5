//! Admin route handlers: product management and order fulfilment.
//!
//! Every handler takes [`RequireAdmin`], which re-reads the role from the
//! store on each request.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use ecostore_core::{OrderId, OrderStatus, ProductId};

use crate::db::{OrderRepository, ProductRepository};
use crate::error::Result;
use crate::extract::ApiJson;
use crate::middleware::RequireAdmin;
use crate::models::{Order, Product, ProductInput};
use crate::state::AppState;

/// Order status change request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list_products(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Json<Vec<Product>> {
    Json(ProductRepository::new(state.db()).list().await)
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<impl IntoResponse> {
    let input = input.validate()?;
    let product = ProductRepository::new(state.db()).create(input).await;

    info!(product_id = %product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<Product>> {
    let input = input.validate()?;
    let product = ProductRepository::new(state.db()).update(id, input).await?;

    info!("Product updated");
    Ok(Json(product))
}

#[instrument(skip_all, fields(admin_id = %admin.id, product_id = %id))]
pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    ProductRepository::new(state.db()).delete(id).await?;

    info!("Product deleted");
    Ok(Json(json!({ "message": "Product deleted" })))
}

/// Every order, newest first.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Json<Vec<Order>> {
    Json(OrderRepository::new(state.db()).list_all().await)
}

/// Move an order along its lifecycle.
#[instrument(skip_all, fields(admin_id = %admin.id, order_id = %id, status = %body.status))]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<OrderId>,
    ApiJson(body): ApiJson<StatusUpdateRequest>,
) -> Result<Json<Order>> {
    let tracking = body
        .tracking_number
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let order = OrderRepository::new(state.db())
        .update_status(id, body.status, tracking)
        .await?;

    info!(tracking_number = ?order.tracking_number, "Order status updated");
    Ok(Json(order))
}
