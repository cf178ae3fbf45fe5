//! Registration, login and session handling.

use ecostore_integration_tests::{DEMO_EMAIL, DEMO_PASSWORD, TestContext, json_body};
use reqwest::StatusCode;
use serde_json::json;

fn registration(email: &str, password: &str) -> serde_json::Value {
    json!({ "name": "Asha Rao", "email": email, "password": password })
}

#[tokio::test]
async fn test_register_then_login() {
    let ctx = TestContext::spawn().await;

    let body = json_body(
        ctx.post(
            "/api/auth/register",
            &registration("Asha@Example.com", "leafy-greens"),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(body["message"], "User registered");

    // Registering does not sign the shopper in.
    let resp = ctx.get("/api/auth/me").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    ctx.login("asha@example.com", "leafy-greens").await;

    let body = json_body(ctx.get("/api/auth/me").await, StatusCode::OK).await;
    assert_eq!(body["user"]["email"], "asha@example.com");
    assert_eq!(body["user"]["name"], "Asha Rao");
    assert_eq!(body["user"]["role"], "customer");
    assert_eq!(body["user"]["points"], 0);
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let ctx = TestContext::spawn().await;

    let body = json_body(
        ctx.post(
            "/api/auth/register",
            &registration(DEMO_EMAIL, "another-password"),
        )
        .await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(body["message"], "User already exists");
}

#[tokio::test]
async fn test_registration_validation() {
    let ctx = TestContext::spawn().await;

    let resp = ctx
        .post("/api/auth/register", &registration("not-an-email", "leafy-greens"))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ctx
        .post("/api/auth/register", &registration("short@example.com", "abc"))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ctx
        .post(
            "/api/auth/register",
            &json!({ "name": "  ", "email": "blank@example.com", "password": "leafy-greens" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_credentials_look_the_same() {
    let ctx = TestContext::spawn().await;

    let wrong_password = json_body(
        ctx.post(
            "/api/auth/login",
            &json!({ "email": DEMO_EMAIL, "password": "wrong-password" }),
        )
        .await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    let unknown_user = json_body(
        ctx.post(
            "/api/auth/login",
            &json!({ "email": "ghost@example.com", "password": DEMO_PASSWORD }),
        )
        .await,
        StatusCode::UNAUTHORIZED,
    )
    .await;

    assert_eq!(wrong_password["message"], "Invalid credentials");
    assert_eq!(wrong_password, unknown_user);
}

#[tokio::test]
async fn test_logout_keeps_cart() {
    let ctx = TestContext::spawn().await;
    ctx.login_demo().await;
    ctx.post("/api/cart/items", &json!({ "productId": 2 })).await;

    let body = json_body(ctx.post("/api/auth/logout", &json!({})).await, StatusCode::OK).await;
    assert_eq!(body["message"], "Logged out");

    assert_eq!(ctx.get("/api/auth/me").await.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(ctx.get("/api/cart/count").await, StatusCode::OK).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_account_routes_require_login() {
    let ctx = TestContext::spawn().await;

    for path in [
        "/api/users/profile",
        "/api/users/stats",
        "/api/users/orders",
        "/api/users/loyalty",
        "/api/users/points",
        "/api/users/rewards",
        "/api/users/recommendations",
    ] {
        let body = json_body(ctx.get(path).await, StatusCode::UNAUTHORIZED).await;
        assert_eq!(body["message"], "Authentication required", "{path}");
    }
}
