//! Wishlist route handlers. The wishlist lives in the session.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use ecostore_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::session::keys;
use crate::models::{Product, Wishlist};
use crate::state::AppState;

async fn load(session: &Session) -> Result<Wishlist> {
    Ok(session
        .get::<Wishlist>(keys::WISHLIST)
        .await?
        .unwrap_or_default())
}

async fn save(session: &Session, wishlist: &Wishlist) -> Result<()> {
    session.insert(keys::WISHLIST, wishlist).await?;
    Ok(())
}

/// Saved products, in the order they were saved. Products removed from the
/// catalog are dropped.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<Json<Vec<Product>>> {
    let mut wishlist = load(&session).await?;
    let mut products = ProductRepository::new(state.db())
        .get_many(wishlist.items())
        .await;

    let before = wishlist.len();
    wishlist.retain(|id| products.contains_key(id));
    if wishlist.len() != before {
        save(&session, &wishlist).await?;
    }

    Ok(Json(
        wishlist
            .items()
            .iter()
            .filter_map(|id| products.remove(id))
            .collect(),
    ))
}

/// Whether a product is saved.
#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn status(
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let wishlist = load(&session).await?;
    Ok(Json(json!({ "inWishlist": wishlist.contains(product_id) })))
}

/// Save a product. Saving twice is harmless.
#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    if ProductRepository::new(state.db())
        .get(product_id)
        .await
        .is_none()
    {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    let mut wishlist = load(&session).await?;
    let added = wishlist.add(product_id);
    if added {
        save(&session, &wishlist).await?;
    }

    let message = if added {
        "Added to wishlist"
    } else {
        "Already in wishlist"
    };
    Ok(Json(json!({
        "message": message,
        "inWishlist": true,
        "count": wishlist.len(),
    })))
}

#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn remove(
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let mut wishlist = load(&session).await?;
    if wishlist.remove(product_id) {
        save(&session, &wishlist).await?;
    }
    Ok(Json(json!({
        "message": "Removed from wishlist",
        "inWishlist": false,
        "count": wishlist.len(),
    })))
}

#[instrument(skip_all)]
pub async fn clear(session: Session) -> Result<impl IntoResponse> {
    save(&session, &Wishlist::default()).await?;
    Ok(Json(json!({ "message": "Wishlist cleared", "count": 0 })))
}
