//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body is `{"message": "..."}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use ecostore_core::{LoyaltyError, PromoError};

use crate::db::RepositoryError;
use crate::models::{CartError, ProductValidationError};
use crate::services::auth::AuthError;
use crate::services::{CartUpdateError, CheckoutError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Cart change rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartUpdateError),

    /// Promo code not recognised.
    #[error(transparent)]
    Promo(#[from] PromoError),

    /// Admin product input rejected.
    #[error(transparent)]
    InvalidProduct(#[from] ProductValidationError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        Self::Cart(CartUpdateError::Cart(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<LoyaltyError> for AppError {
    fn from(err: LoyaltyError) -> Self {
        Self::Database(RepositoryError::Loyalty(err))
    }
}

fn repository_response(err: &RepositoryError) -> (StatusCode, String) {
    match err {
        RepositoryError::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
        RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
        RepositoryError::Transition(e) => (StatusCode::BAD_REQUEST, e.to_string()),
        RepositoryError::Loyalty(e @ LoyaltyError::InsufficientPoints { .. }) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        RepositoryError::Loyalty(e @ LoyaltyError::UnknownReward(_)) => {
            (StatusCode::NOT_FOUND, e.to_string())
        }
    }
}

impl AppError {
    /// Status code and client-facing message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Database(err) => repository_response(err),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                }
                AuthError::UserAlreadyExists => (
                    StatusCode::CONFLICT,
                    "User already exists".to_string(),
                ),
                AuthError::WeakPassword(msg) | AuthError::InvalidName(msg) => {
                    (StatusCode::BAD_REQUEST, msg.clone())
                }
                AuthError::InvalidEmail(_) => {
                    (StatusCode::BAD_REQUEST, "Invalid email address".to_string())
                }
                AuthError::Repository(err) => repository_response(err),
                AuthError::PasswordHash => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            },
            Self::Checkout(CheckoutError::EmptyCart) => {
                (StatusCode::BAD_REQUEST, "Cart is empty".to_string())
            }
            Self::Checkout(CheckoutError::Repository(err)) => repository_response(err),
            Self::Cart(CartUpdateError::UnknownProduct(_)) => {
                (StatusCode::NOT_FOUND, "Product not found".to_string())
            }
            Self::Cart(CartUpdateError::Cart(err @ CartError::NotInCart(_))) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            Self::Cart(CartUpdateError::Cart(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Promo(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::InvalidProduct(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests, please try again later".to_string(),
            ),
            // Don't expose internal error details to clients
            Self::Session(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs show up in Sentry reports as the trail leading to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, String)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    for (key, value) in data {
        breadcrumb
            .data
            .insert((*key).to_string(), serde_json::Value::String(value.clone()));
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecostore_core::{OrderStatus, ProductId, RewardId};

    use super::*;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status_of(AppError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::Unauthorized("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_domain_errors_map_to_client_statuses() {
        assert_eq!(status_of(AuthError::UserAlreadyExists), StatusCode::CONFLICT);
        assert_eq!(status_of(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(CheckoutError::EmptyCart), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(PromoError::Unknown("NOPE".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CartError::QuantityTooLarge { max: 99 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CartError::NotInCart(ProductId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RepositoryError::Loyalty(LoyaltyError::UnknownReward(
                RewardId::new(9)
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RepositoryError::Transition(
                OrderStatus::Delivered
                    .transition(OrderStatus::Shipped)
                    .unwrap_err()
            )),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_error_body_is_json_message() {
        let response = AppError::from(LoyaltyError::InsufficientPoints {
            needed: 500,
            available: 150,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Not enough points: need 500, have 150");
    }
}
