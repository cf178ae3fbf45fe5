//! Points, tiers, account stats and reward redemption.

use ecostore_integration_tests::{DEMO_POINTS, TestContext, json_body};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_demo_account_standing() {
    let ctx = TestContext::spawn().await;
    ctx.login_demo().await;

    let body = json_body(ctx.get("/api/users/loyalty").await, StatusCode::OK).await;
    assert_eq!(body["points"], DEMO_POINTS);
    assert_eq!(body["tier"], "Bronze");
    assert_eq!(body["nextTier"], "Silver");
    assert_eq!(body["pointsToNext"], 50);
    assert_eq!(body["progressPercent"], 75);

    let body = json_body(ctx.get("/api/users/stats").await, StatusCode::OK).await;
    assert_eq!(body["totalOrders"], 3);
    assert_eq!(body["points"], DEMO_POINTS);
    assert_eq!(body["ecoImpact"]["ecoProducts"], 6);
    assert_eq!(body["ecoImpact"]["treesPlanted"], 0);

    let body = json_body(ctx.get("/api/users/points").await, StatusCode::OK).await;
    assert_eq!(body["points"], DEMO_POINTS);
    assert_eq!(body["history"][0]["type"], "opening");
    assert_eq!(body["history"][0]["balanceAfter"], DEMO_POINTS);
}

#[tokio::test]
async fn test_rewards_flag_what_is_affordable() {
    let ctx = TestContext::spawn().await;
    ctx.login_demo().await;

    let body = json_body(ctx.get("/api/users/rewards").await, StatusCode::OK).await;
    let rewards = body.as_array().expect("expected a reward array");
    assert_eq!(rewards.len(), 4);

    let affordable: Vec<u64> = rewards
        .iter()
        .filter(|r| r["canRedeem"] == true)
        .filter_map(|r| r["id"].as_u64())
        .collect();
    assert_eq!(affordable, vec![1, 2]);
}

#[tokio::test]
async fn test_redeem_reward() {
    let ctx = TestContext::spawn().await;
    ctx.login_demo().await;

    let body = json_body(
        ctx.post("/api/users/rewards/1/redeem", &json!({})).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["message"], "Redeemed 10% Off Next Order");
    assert_eq!(body["redemption"]["pointsSpent"], 100);
    assert_eq!(body["redemption"]["pointsBalance"], 50);

    let body = json_body(ctx.get("/api/users/points").await, StatusCode::OK).await;
    assert_eq!(body["points"], 50);
    assert_eq!(body["history"][0]["type"], "redeemed");
    assert_eq!(body["history"][0]["rewardId"], 1);
    assert_eq!(body["history"][0]["delta"], -100);

    // 50 left: the same reward is now out of reach.
    let resp = ctx.post("/api/users/rewards/1/redeem", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_redeem_unknown_or_unaffordable() {
    let ctx = TestContext::spawn().await;
    ctx.login_demo().await;

    let resp = ctx.post("/api/users/rewards/3/redeem", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ctx.post("/api/users/rewards/99/redeem", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = json_body(ctx.get("/api/users/loyalty").await, StatusCode::OK).await;
    assert_eq!(body["points"], DEMO_POINTS);
}

#[tokio::test]
async fn test_orders_move_the_tier() {
    let ctx = TestContext::spawn().await;
    ctx.login_demo().await;

    // Solar Power Bank: 49.99 + 99 shipping + 9.00 tax = 157.99
    ctx.post("/api/cart/items", &json!({ "productId": 4 })).await;
    let body = json_body(ctx.post("/api/orders", &json!({})).await, StatusCode::CREATED).await;
    assert_eq!(body["pointsEarned"], 157);

    let body = json_body(ctx.get("/api/users/loyalty").await, StatusCode::OK).await;
    assert_eq!(body["points"], DEMO_POINTS + 157);
    assert_eq!(body["tier"], "Silver");
    assert_eq!(body["nextTier"], "Gold");
}
