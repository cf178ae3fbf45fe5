//! Cart, promo codes, wishlist and checkout.

use ecostore_integration_tests::{DEMO_POINTS, TestContext, json_body};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_starts_empty() {
    let ctx = TestContext::spawn().await;

    let body = json_body(ctx.get("/api/cart").await, StatusCode::OK).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totals"]["itemCount"], 0);

    let body = json_body(ctx.get("/api/cart/count").await, StatusCode::OK).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_add_update_and_remove_items() {
    let ctx = TestContext::spawn().await;

    let body = json_body(
        ctx.post("/api/cart/items", &json!({ "productId": 1, "quantity": 2 }))
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["items"][0]["lineTotal"], "59.98");
    assert_eq!(body["totals"]["subtotal"], "59.98");
    assert_eq!(body["totals"]["tax"], "10.80");
    assert_eq!(body["totals"]["total"], "169.78");

    // Adding the same product again merges into one line.
    let body = json_body(
        ctx.post("/api/cart/items", &json!({ "productId": 1 })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["items"][0]["quantity"], 3);

    let body = json_body(
        ctx.put("/api/cart/items/1", &json!({ "quantity": 1 })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["items"][0]["quantity"], 1);

    // Zero removes the line.
    let body = json_body(
        ctx.put("/api/cart/items/1", &json!({ "quantity": 0 })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["items"], json!([]));

    let body = json_body(ctx.delete("/api/cart/items/1").await, StatusCode::NOT_FOUND).await;
    assert_eq!(body["message"], "Product is not in the cart");
}

#[tokio::test]
async fn test_add_unknown_product() {
    let ctx = TestContext::spawn().await;
    let body = json_body(
        ctx.post("/api/cart/items", &json!({ "productId": 999 })).await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let ctx = TestContext::spawn().await;
    let other = ctx.new_session();

    ctx.post("/api/cart/items", &json!({ "productId": 2 })).await;

    let body = json_body(ctx.get("/api/cart/count").await, StatusCode::OK).await;
    assert_eq!(body["count"], 1);
    let body = json_body(other.get("/api/cart/count").await, StatusCode::OK).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_promo_codes() {
    let ctx = TestContext::spawn().await;
    ctx.post("/api/cart/items", &json!({ "productId": 1, "quantity": 2 }))
        .await;

    let body = json_body(
        ctx.post("/api/cart/promo", &json!({ "code": "save10" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["totals"]["promoCode"], "SAVE10");
    assert_eq!(body["totals"]["discount"], "6.00");
    assert_eq!(body["totals"]["total"], "163.78");

    let body = json_body(
        ctx.post("/api/cart/promo", &json!({ "code": "FREESTUFF" })).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["message"], "Invalid promo code");

    // The rejected code leaves the applied one alone.
    let body = json_body(ctx.get("/api/cart").await, StatusCode::OK).await;
    assert_eq!(body["totals"]["promoCode"], "SAVE10");

    let body = json_body(ctx.delete("/api/cart/promo").await, StatusCode::OK).await;
    assert_eq!(body["totals"]["promoCode"], json!(null));
    assert_eq!(body["totals"]["total"], "169.78");
}

#[tokio::test]
async fn test_clear_cart() {
    let ctx = TestContext::spawn().await;
    ctx.post("/api/cart/items", &json!({ "productId": 4 })).await;
    ctx.post("/api/cart/promo", &json!({ "code": "ECO20" })).await;

    let body = json_body(ctx.delete("/api/cart").await, StatusCode::OK).await;
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totals"]["promoCode"], json!(null));
}

// ============================================================================
// Wishlist
// ============================================================================

#[tokio::test]
async fn test_wishlist_lifecycle() {
    let ctx = TestContext::spawn().await;

    let body = json_body(ctx.post("/api/wishlist/5", &json!({})).await, StatusCode::OK).await;
    assert_eq!(body["inWishlist"], true);
    assert_eq!(body["count"], 1);

    let body = json_body(ctx.post("/api/wishlist/5", &json!({})).await, StatusCode::OK).await;
    assert_eq!(body["message"], "Already in wishlist");
    assert_eq!(body["count"], 1);

    let body = json_body(ctx.get("/api/wishlist/5").await, StatusCode::OK).await;
    assert_eq!(body["inWishlist"], true);

    let body = json_body(ctx.get("/api/wishlist").await, StatusCode::OK).await;
    assert_eq!(body[0]["name"], "Recycled Notebook");

    let body = json_body(ctx.delete("/api/wishlist/5").await, StatusCode::OK).await;
    assert_eq!(body["inWishlist"], false);
    assert_eq!(body["count"], 0);

    let body = json_body(
        ctx.post("/api/wishlist/999", &json!({})).await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["message"], "Product not found");
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_requires_login() {
    let ctx = TestContext::spawn().await;
    ctx.post("/api/cart/items", &json!({ "productId": 1 })).await;

    let body = json_body(ctx.post("/api/orders", &json!({})).await, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let ctx = TestContext::spawn().await;
    ctx.login_demo().await;

    let body = json_body(ctx.post("/api/orders", &json!({})).await, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["message"], "Cart is empty");
}

#[tokio::test]
async fn test_checkout_credits_points_and_clears_cart() {
    let ctx = TestContext::spawn().await;

    // The cart built before logging in survives the login.
    ctx.post("/api/cart/items", &json!({ "productId": 1, "quantity": 2 }))
        .await;
    ctx.post("/api/cart/promo", &json!({ "code": "SAVE10" })).await;
    ctx.login_demo().await;

    let body = json_body(ctx.post("/api/orders", &json!({})).await, StatusCode::CREATED).await;
    assert_eq!(body["message"], "Order placed successfully");
    assert_eq!(body["order"]["totals"]["total"], "163.78");
    assert_eq!(body["order"]["status"], "processing");
    assert_eq!(body["pointsEarned"], 163);
    assert_eq!(body["pointsBalance"], DEMO_POINTS + 163);

    let body = json_body(ctx.get("/api/cart/count").await, StatusCode::OK).await;
    assert_eq!(body["count"], 0);

    let orders = json_body(ctx.get("/api/users/orders").await, StatusCode::OK).await;
    let orders = orders.as_array().expect("expected an order array");
    assert_eq!(orders.len(), 4);
    assert_eq!(orders.first().map(|o| &o["status"]), Some(&json!("processing")));

    let sold = json_body(ctx.get("/api/orders/sold-products").await, StatusCode::OK).await;
    // Three bottles across the seed history, two more just now.
    assert_eq!(sold[0]["name"], "Eco-Friendly Water Bottle");
    assert_eq!(sold[0]["soldQuantity"], 5);
}
