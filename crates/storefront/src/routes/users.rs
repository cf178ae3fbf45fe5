//! Account route handlers. Every handler requires a signed-in user.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use tracing::instrument;

use ecostore_core::{RewardId, TierProgress};

use crate::db::{OrderRepository, UserRepository};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::models::{Order, Product, User};
use crate::services::{AccountStats, CatalogService, LoyaltyService, RewardOffer};
use crate::state::AppState;

#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    UserRepository::new(state.db())
        .get_by_id(current.id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<AccountStats>> {
    Ok(Json(LoyaltyService::new(state.db()).stats(current.id).await?))
}

/// Order history, newest first.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Json<Vec<Order>> {
    Json(OrderRepository::new(state.db()).list_for_user(current.id).await)
}

/// Tier and progress towards the next one.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn loyalty(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<TierProgress>> {
    Ok(Json(LoyaltyService::new(state.db()).summary(current.id).await?))
}

/// Balance and ledger.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn points(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let service = LoyaltyService::new(state.db());
    let summary = service.summary(current.id).await?;
    let history = service.ledger(current.id).await;
    Ok(Json(json!({ "points": summary.points, "history": history })))
}

#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn rewards(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<RewardOffer>>> {
    Ok(Json(LoyaltyService::new(state.db()).rewards(current.id).await?))
}

#[instrument(skip_all, fields(user_id = %current.id, reward_id = %reward_id))]
pub async fn redeem(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(reward_id): Path<RewardId>,
) -> Result<impl IntoResponse> {
    let redemption = LoyaltyService::new(state.db())
        .redeem(current.id, reward_id)
        .await?;

    add_breadcrumb(
        "loyalty",
        "Reward redeemed",
        &[("reward_id", reward_id.to_string())],
    );
    Ok(Json(json!({
        "message": format!("Redeemed {}", redemption.reward.title),
        "redemption": redemption,
    })))
}

/// Suggestions from the shopper's viewing history.
#[instrument(skip_all, fields(user_id = %current.id))]
pub async fn recommendations(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(
        CatalogService::new(state.db())
            .recommendations(current.id)
            .await?,
    ))
}
