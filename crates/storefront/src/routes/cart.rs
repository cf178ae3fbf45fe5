//! Cart route handlers.
//!
//! The cart lives in the session under [`keys::CART`] and is priced against
//! the live catalog on every read.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use ecostore_core::{ProductId, PromoCode};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::extract::ApiJson;
use crate::models::Cart;
use crate::models::session::keys;
use crate::services::{CartService, CartView};
use crate::state::AppState;

/// Load the session cart (empty when none is stored).
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns `AppError::Session` if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Price `cart`, persist it, and return the view.
async fn respond(state: &AppState, session: &Session, mut cart: Cart) -> Result<Json<CartView>> {
    let (view, _) = CartService::new(state.db(), state.pricing())
        .resolve(&mut cart)
        .await;
    save_cart(session, &cart).await?;
    Ok(Json(view))
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: i64,
}

/// Promo code request body.
#[derive(Debug, Deserialize)]
pub struct PromoRequest {
    pub code: String,
}

/// Show the cart with totals.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    let (view, pruned) = CartService::new(state.db(), state.pricing())
        .resolve(&mut cart)
        .await;
    if pruned {
        save_cart(&session, &cart).await?;
    }
    Ok(Json(view))
}

/// Cart badge count.
#[instrument(skip_all)]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;
    Ok(Json(json!({ "count": cart.total_quantity() })))
}

/// Add a product, merging with an existing line.
#[instrument(skip_all, fields(product_id = %body.product_id))]
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<AddItemRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    let quantity = CartService::new(state.db(), state.pricing())
        .add_item(&mut cart, body.product_id, body.quantity.unwrap_or(1))
        .await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[
            ("product_id", body.product_id.to_string()),
            ("quantity", quantity.to_string()),
        ],
    );
    respond(&state, &session, cart).await
}

/// Replace a line's quantity; zero or less removes it.
#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
    ApiJson(body): ApiJson<UpdateItemRequest>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(product_id, body.quantity)?;
    respond(&state, &session, cart).await
}

#[instrument(skip_all, fields(product_id = %product_id))]
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<ProductId>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    if !cart.remove(product_id) {
        return Err(AppError::NotFound("Product is not in the cart".to_string()));
    }
    respond(&state, &session, cart).await
}

/// Empty the cart and drop the promo code.
#[instrument(skip_all)]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    respond(&state, &session, Cart::default()).await
}

/// Apply a promo code (case-insensitive).
#[instrument(skip_all)]
pub async fn apply_promo(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<PromoRequest>,
) -> Result<Json<CartView>> {
    let code: PromoCode = body.code.parse()?;
    let mut cart = load_cart(&session).await?;
    cart.set_promo_code(Some(code));
    respond(&state, &session, cart).await
}

#[instrument(skip_all)]
pub async fn remove_promo(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.set_promo_code(None);
    respond(&state, &session, cart).await
}
