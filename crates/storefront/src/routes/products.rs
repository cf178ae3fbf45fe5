//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use ecostore_core::ProductId;

use crate::error::{AppError, Result};
use crate::extract::ApiQuery;
use crate::middleware::OptionalAuth;
use crate::models::Product;
use crate::services::{CatalogService, ProductQuery, TagCount};
use crate::state::AppState;

/// Product listing with search, filters and sorting.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Json<Vec<Product>> {
    Json(CatalogService::new(state.db()).search(&query).await)
}

/// Tags with product counts.
pub async fn categories(State(state): State<AppState>) -> Json<Vec<TagCount>> {
    Json(CatalogService::new(state.db()).categories().await)
}

/// Product detail. Signed-in views feed recommendations.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    CatalogService::new(state.db())
        .view(id, user.map(|u| u.id))
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}
