//! Integration tests for add-to-cart.

use coffee_cup_hut_integration_tests::{FakeShopify, SOLD_OUT_VARIANT, TestContext};
use serde_json::json;

async fn add(ctx: &TestContext, lines: &str, fragment: bool) -> reqwest::Response {
    let mut request = ctx
        .client
        .post(ctx.url("/cart"))
        .form(&[("action", "LinesAdd"), ("lines", lines)]);
    if fragment {
        request = request.header("x-fragment", "1");
    }
    request.send().await.expect("cart post")
}

#[tokio::test]
async fn test_first_add_creates_cart_with_exact_lines() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let resp = add(&ctx, r#"[{"merchandiseId":"V123","quantity":1}]"#, true).await;
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.expect("body");
    assert!(body.contains("cart-count\">1<"));

    let request = ctx.last_request("cartCreate").expect("create request");
    assert_eq!(
        request["variables"]["input"]["lines"],
        json!([{"merchandiseId": "V123", "quantity": 1}])
    );
}

#[tokio::test]
async fn test_second_add_uses_session_cart() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    add(&ctx, r#"[{"merchandiseId":"V123","quantity":1}]"#, true).await;
    let resp = add(&ctx, r#"[{"merchandiseId":"V456","quantity":2}]"#, true).await;
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.expect("body").contains("cart-count\">3<"));

    let request = ctx.last_request("cartLinesAdd").expect("lines add request");
    assert_eq!(request["variables"]["cartId"], "gid://shopify/Cart/existing");
    assert_eq!(
        request["variables"]["lines"],
        json!([{"merchandiseId": "V456", "quantity": 2}])
    );
}

#[tokio::test]
async fn test_sold_out_variant_returns_form_error() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let lines = json!([{"merchandiseId": SOLD_OUT_VARIANT, "quantity": 1}]).to_string();
    let resp = add(&ctx, &lines, true).await;
    assert_eq!(resp.status(), 422);
    assert!(resp.text().await.expect("body").contains("This item is sold out."));
}

#[tokio::test]
async fn test_backend_failure_returns_generic_error() {
    let ctx = TestContext::start(FakeShopify {
        failing: true,
        ..FakeShopify::default()
    })
    .await;

    let resp = add(&ctx, r#"[{"merchandiseId":"V123","quantity":1}]"#, true).await;
    assert_eq!(resp.status(), 502);
    let body = resp.text().await.expect("body");
    assert!(body.contains("update your cart. Please try again."));
    assert!(!body.contains("HTTP 500"));
}

#[tokio::test]
async fn test_invalid_lines_are_rejected_without_backend_call() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let resp = add(&ctx, r#"[{"merchandiseId":"V123","quantity":0}]"#, true).await;
    assert_eq!(resp.status(), 400);
    assert!(ctx.requests().is_empty());
}

#[tokio::test]
async fn test_plain_post_redirects_back() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let resp = ctx
        .client
        .post(ctx.url("/cart"))
        .header("referer", ctx.url("/collections/all?direction=next&cursor=cursor-7"))
        .form(&[
            ("action", "LinesAdd"),
            ("lines", r#"[{"merchandiseId":"V123","quantity":1}]"#),
        ])
        .send()
        .await
        .expect("cart post");

    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers()["location"],
        "/collections/all?direction=next&cursor=cursor-7"
    );
}

#[tokio::test]
async fn test_cart_page_redirects_to_checkout() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers()["location"], "/collections/all");

    add(&ctx, r#"[{"merchandiseId":"V123","quantity":1}]"#, true).await;
    let resp = ctx.get("/cart").await;
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers()["location"],
        "https://coffee-cup-hut.myshopify.com/cart/c/1"
    );
}
