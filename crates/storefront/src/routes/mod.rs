//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness with catalog size
//! GET    /health/ready                    - Readiness
//!
//! # Products
//! GET    /api/products                    - Search, filter, sort
//! GET    /api/products/categories         - Tags with counts
//! GET    /api/products/{id}               - Product detail
//!
//! # Auth (rate limited)
//! POST   /api/auth/register               - Create account
//! POST   /api/auth/login                  - Sign in
//! POST   /api/auth/logout                 - Sign out
//! GET    /api/auth/me                     - Current user
//!
//! # Account (requires auth)
//! GET    /api/users/profile
//! GET    /api/users/stats
//! GET    /api/users/orders
//! GET    /api/users/loyalty
//! GET    /api/users/points
//! GET    /api/users/rewards
//! POST   /api/users/rewards/{id}/redeem
//! GET    /api/users/recommendations
//!
//! # Cart (session)
//! GET    /api/cart                        - Lines and totals
//! DELETE /api/cart                        - Empty the cart
//! GET    /api/cart/count                  - Badge count
//! POST   /api/cart/items                  - Add item
//! PUT    /api/cart/items/{productId}      - Set quantity
//! DELETE /api/cart/items/{productId}      - Remove item
//! POST   /api/cart/promo                  - Apply promo code
//! DELETE /api/cart/promo                  - Remove promo code
//!
//! # Wishlist (session)
//! GET    /api/wishlist
//! DELETE /api/wishlist
//! GET    /api/wishlist/{productId}
//! POST   /api/wishlist/{productId}
//! DELETE /api/wishlist/{productId}
//!
//! # Orders
//! POST   /api/orders                      - Checkout (requires auth)
//! GET    /api/orders/sold-products        - Best sellers
//!
//! # Admin (requires admin)
//! GET    /api/admin/products
//! POST   /api/admin/products
//! PUT    /api/admin/products/{id}
//! DELETE /api/admin/products/{id}
//! GET    /api/admin/orders
//! PATCH  /api/admin/orders/{id}/status
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlist;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, patch, post, put},
};
use serde_json::{Value, json};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/categories", get(products::categories))
        .route("/{id}", get(products::show))
}

/// Create the auth routes router, optionally rate limited.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    if !rate_limit {
        return router;
    }
    match auth_rate_limiter() {
        Some(limiter) => router.layer(limiter),
        None => {
            tracing::warn!("Auth rate limiter could not be built; continuing without it");
            router
        }
    }
}

/// Create the account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(users::profile))
        .route("/stats", get(users::stats))
        .route("/orders", get(users::orders))
        .route("/loyalty", get(users::loyalty))
        .route("/points", get(users::points))
        .route("/rewards", get(users::rewards))
        .route("/rewards/{id}/redeem", post(users::redeem))
        .route("/recommendations", get(users::recommendations))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/count", get(cart::count))
        .route("/items", post(cart::add_item))
        .route(
            "/items/{product_id}",
            put(cart::update_item).delete(cart::remove_item),
        )
        .route("/promo", post(cart::apply_promo).delete(cart::remove_promo))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index).delete(wishlist::clear))
        .route(
            "/{product_id}",
            get(wishlist::status)
                .post(wishlist::add)
                .delete(wishlist::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/sold-products", get(orders::sold_products))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/orders", get(admin::list_orders))
        .route("/orders/{id}/status", patch(admin::update_order_status))
}

/// Create all `/api` routes.
pub fn api_routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/auth", auth_routes(rate_limit))
        .nest("/users", user_routes())
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .nest("/orders", order_routes())
        .nest("/admin", admin_routes())
        .fallback(api_not_found)
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes(rate_limit))
        .fallback(not_found)
}

async fn api_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "API endpoint not found" })),
    )
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}
