//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::SoldProduct;
use crate::routes::cart::{load_cart, save_cart};
use crate::services::{CatalogService, CheckoutService};
use crate::state::AppState;

/// Check out the session cart.
///
/// Totals are recomputed from catalog prices; the request carries no body.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let mut cart = load_cart(&session).await?;
    let placed = CheckoutService::new(state.db(), state.pricing())
        .place_order(current.id, &mut cart)
        .await?;
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "checkout",
        "Order placed",
        &[("order_id", placed.order.id.to_string())],
    );
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Order placed successfully",
            "pointsEarned": placed.order.points_earned,
            "pointsBalance": placed.points_balance,
            "order": placed.order,
        })),
    ))
}

/// Catalog products that have sold, best sellers first.
#[instrument(skip_all)]
pub async fn sold_products(State(state): State<AppState>) -> Json<Vec<SoldProduct>> {
    Json(CatalogService::new(state.db()).sold_products().await)
}
