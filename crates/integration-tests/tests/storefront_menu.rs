//! Integration tests for the header menu and its toggle fragment.

use coffee_cup_hut_integration_tests::{FakeShopify, TestContext};

const SHOP: &str = "gid%3A%2F%2Fshopify%2FMenuItem%2Fshop";

#[tokio::test]
async fn test_menu_renders_collapsed_with_internal_links_rewritten() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let html = ctx.get("/pages/contact").await.text().await.expect("body");

    assert!(html.contains("id=\"header-menu\""));
    assert!(html.contains(">Shop</a>"));
    assert!(html.contains(">About</a>"));
    assert!(!html.contains(">Mugs</a>"));
    assert!(html.contains("href=\"/collections\""));
}

#[tokio::test]
async fn test_toggle_opens_then_closes_submenu() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let opened = ctx.get(&format!("/fragments/menu?open=&select={SHOP}")).await;
    assert_eq!(opened.status(), 200);
    let opened = opened.text().await.expect("body");
    assert!(opened.contains("is-open"));
    assert!(opened.contains(">Mugs</a>"));
    assert!(opened.contains("href=\"/collections/mugs\""));
    assert!(opened.contains("href=\"/collections/tumblers\""));
    assert!(!opened.contains("<html"));

    let closed = ctx
        .get(&format!("/fragments/menu?open={SHOP}&select={SHOP}"))
        .await
        .text()
        .await
        .expect("body");
    assert!(!closed.contains(">Mugs</a>"));
}

#[tokio::test]
async fn test_toggle_ignores_unknown_ids() {
    let ctx = TestContext::start(FakeShopify::default()).await;

    let html = ctx
        .get("/fragments/menu?open=gid%3A%2F%2Fshopify%2FMenuItem%2Fgone&select=nope")
        .await
        .text()
        .await
        .expect("body");
    assert!(!html.contains("is-open"));
}

#[tokio::test]
async fn test_missing_menu_uses_fallback_navigation() {
    let ctx = TestContext::start(FakeShopify {
        menu: None,
        ..FakeShopify::default()
    })
    .await;

    let resp = ctx.get("/pages/contact").await;
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.expect("body");
    assert!(html.contains("id=\"header-menu\""));
    assert!(html.contains(">Blog</a>"));
}
