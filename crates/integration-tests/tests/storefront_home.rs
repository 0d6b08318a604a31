//! Integration tests for the streamed home page and the cart badge.

use coffee_cup_hut_core::filter::MetafieldFilter;
use coffee_cup_hut_integration_tests::{
    FakeShopify, TestContext, deferred_fill, product_titles,
};

fn tagged() -> FakeShopify {
    FakeShopify {
        recommended_tags: vec![
            Some("staff-pick".to_string()),
            Some("seasonal".to_string()),
            None,
            Some("staff-pick".to_string()),
        ],
        ..FakeShopify::default()
    }
}

fn staff_pick_filter(value: &str) -> Option<MetafieldFilter> {
    MetafieldFilter::parse("custom.tag", value)
}

#[tokio::test]
async fn test_home_streams_shell_and_slots() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.expect("body");

    assert!(html.contains("Find Your Perfect Coffee Companion"));
    assert!(html.contains("Ceramic Mugs"));
    assert!(html.contains("Loading..."));
    assert!(html.trim_end().ends_with("</html>"));

    let picks = deferred_fill(&html, "recommended-products").expect("recommended fill");
    assert_eq!(product_titles(&picks).len(), 4);
}

#[tokio::test]
async fn test_badge_is_zero_without_cart() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let html = ctx.get("/").await.text().await.expect("body");

    let badge = deferred_fill(&html, "cart-badge").expect("badge fill");
    assert!(badge.contains(">0<"));
    assert!(!ctx.operations().iter().any(|op| op == "CartSummary"));
}

#[tokio::test]
async fn test_badge_shows_cart_quantity() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let resp = ctx
        .client
        .post(ctx.url("/cart"))
        .header("x-fragment", "1")
        .form(&[
            ("action", "LinesAdd"),
            ("lines", r#"[{"merchandiseId":"gid://shopify/ProductVariant/3","quantity":7}]"#),
        ])
        .send()
        .await
        .expect("cart post");
    assert_eq!(resp.status(), 200);

    let html = ctx.get("/").await.text().await.expect("body");
    let badge = deferred_fill(&html, "cart-badge").expect("badge fill");
    assert!(badge.contains(">7<"));
}

#[tokio::test]
async fn test_metafield_filter_keeps_matching_products() {
    let ctx = TestContext::start_with_filter(tagged(), staff_pick_filter("staff-pick")).await;

    let html = ctx.get("/").await.text().await.expect("body");
    let picks = deferred_fill(&html, "recommended-products").expect("recommended fill");
    assert_eq!(product_titles(&picks), ["Mug 0", "Mug 3"]);

    let request = ctx.last_request("RecommendedProducts").expect("request");
    assert_eq!(request["variables"]["withMetafield"], true);
    assert_eq!(request["variables"]["metafieldNamespace"], "custom");
    assert_eq!(request["variables"]["metafieldKey"], "tag");
}

#[tokio::test]
async fn test_metafield_filter_without_matches_shows_empty_state() {
    let ctx = TestContext::start_with_filter(tagged(), staff_pick_filter("clearance")).await;

    let html = ctx.get("/").await.text().await.expect("body");
    let picks = deferred_fill(&html, "recommended-products").expect("recommended fill");
    assert!(picks.contains("No recommended products found."));
}

#[tokio::test]
async fn test_home_without_collection_still_renders() {
    let ctx = TestContext::start(FakeShopify {
        has_collection: false,
        ..FakeShopify::default()
    })
    .await;

    let resp = ctx.get("/").await;
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.expect("body");
    assert!(!html.contains("Ceramic Mugs"));
}

#[tokio::test]
async fn test_unserved_link_targets_are_not_found() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    for path in [
        "/products/classic-mug",
        "/collections/mugs",
        "/collections",
        "/policies",
        "/blogs/journal",
    ] {
        let resp = ctx.get(path).await;
        assert_eq!(resp.status(), 404, "{path}");
    }
    assert!(ctx.requests().is_empty());
}
