//! Integration test harness for the Coffee Cup Hut storefront.
//!
//! [`TestContext::start`] boots a fake Storefront API and the storefront
//! router on ephemeral ports. The fake backend answers by `operationName`,
//! records every GraphQL request it receives, and pages through its catalog
//! with real cursor semantics.
//!
//! ```rust,ignore
//! let ctx = TestContext::start(FakeShopify::default()).await;
//! let resp = ctx.get("/collections/all").await;
//! assert_eq!(ctx.operations(), ["Header", "AllProducts"]);
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{Json, Router, extract::State, routing::post};
use coffee_cup_hut_core::Locale;
use coffee_cup_hut_core::filter::MetafieldFilter;
use coffee_cup_hut_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use coffee_cup_hut_storefront::state::AppState;
use reqwest::Client;
use serde_json::{Value, json};

/// Variant id the fake cart rejects as sold out.
pub const SOLD_OUT_VARIANT: &str = "gid://shopify/ProductVariant/sold-out";

// =============================================================================
// Fake Storefront API
// =============================================================================

/// Canned data served by the fake Storefront API.
#[derive(Debug, Clone)]
pub struct FakeShopify {
    /// Number of products in the catalog.
    pub catalog_size: usize,
    /// Metafield value per recommended product (the first four).
    pub recommended_tags: Vec<Option<String>>,
    /// Menu items; `None` means the shop has no menu with that handle.
    pub menu: Option<Value>,
    /// Whether the shop has any collection.
    pub has_collection: bool,
    /// Quantity already in the cart `gid://shopify/Cart/existing`.
    pub existing_cart_quantity: i64,
    /// Answer every request with HTTP 500.
    pub failing: bool,
}

impl Default for FakeShopify {
    fn default() -> Self {
        Self {
            catalog_size: 20,
            recommended_tags: vec![None; 4],
            menu: Some(json!([
                {
                    "id": "gid://shopify/MenuItem/shop",
                    "title": "Shop",
                    "url": "https://coffee-cup-hut.myshopify.com/collections",
                    "items": [
                        {"id": "gid://shopify/MenuItem/mugs", "title": "Mugs", "url": "https://coffeecuphut.com/collections/mugs", "items": []},
                        {"id": "gid://shopify/MenuItem/tumblers", "title": "Tumblers", "url": "/collections/tumblers", "items": []}
                    ]
                },
                {"id": "gid://shopify/MenuItem/about", "title": "About", "url": "/pages/about", "items": []}
            ])),
            has_collection: true,
            existing_cart_quantity: 7,
            failing: false,
        }
    }
}

#[derive(Debug, Default)]
struct Recorded {
    requests: Vec<Value>,
    cart_quantity: Option<i64>,
}

#[derive(Clone)]
struct FakeState {
    data: Arc<FakeShopify>,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeState {
    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn product(index: usize, tag: Option<&str>) -> Value {
    json!({
        "id": format!("gid://shopify/Product/{index}"),
        "handle": format!("mug-{index}"),
        "title": format!("Mug {index}"),
        "featuredImage": {
            "id": format!("gid://shopify/ProductImage/{index}"),
            "url": format!("https://cdn.shopify.com/s/files/mug-{index}.png"),
            "altText": null,
            "width": 800,
            "height": 800
        },
        "priceRange": {
            "minVariantPrice": {"amount": "18.0", "currencyCode": "USD"},
            "maxVariantPrice": {"amount": "24.0", "currencyCode": "USD"}
        },
        "variants": {"nodes": [{
            "id": format!("gid://shopify/ProductVariant/{index}"),
            "selectedOptions": [{"name": "Color", "value": "Black"}]
        }]},
        "metafield": tag.map(|value| json!({"value": value}))
    })
}

fn cursor(index: usize) -> String {
    format!("cursor-{index}")
}

fn cursor_index(value: &Value) -> Option<usize> {
    value.as_str()?.strip_prefix("cursor-")?.parse().ok()
}

fn page_window(len: usize, variables: &Value) -> (usize, usize) {
    let count = |key: &str| {
        variables[key]
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
    };
    if let Some(last) = count("last") {
        let end = cursor_index(&variables["before"]).unwrap_or(len).min(len);
        (end.saturating_sub(last), end)
    } else {
        let start = cursor_index(&variables["after"]).map_or(0, |i| i + 1).min(len);
        let first = count("first").unwrap_or(len);
        (start, (start + first).min(len))
    }
}

fn cart(id: &str, quantity: i64) -> Value {
    json!({
        "id": id,
        "totalQuantity": quantity,
        "checkoutUrl": format!("https://coffee-cup-hut.myshopify.com/cart/c/{quantity}")
    })
}

fn cart_mutation(state: &FakeState, field: &str, lines: &Value) -> Value {
    let lines = lines.as_array().cloned().unwrap_or_default();
    if lines
        .iter()
        .any(|line| line["merchandiseId"] == SOLD_OUT_VARIANT)
    {
        return payload(
            field,
            json!({
                "cart": null,
                "userErrors": [{"field": ["lines", "0", "merchandiseId"], "message": "This item is sold out."}]
            }),
        );
    }

    let added: i64 = lines.iter().filter_map(|line| line["quantity"].as_i64()).sum();
    let mut recorded = state.recorded();
    let base = recorded
        .cart_quantity
        .unwrap_or(state.data.existing_cart_quantity);
    let quantity = if field == "cartCreate" { added } else { base + added };
    recorded.cart_quantity = Some(quantity);

    payload(
        field,
        json!({
            "cart": cart("gid://shopify/Cart/existing", quantity),
            "userErrors": []
        }),
    )
}

fn payload(field: &str, value: Value) -> Value {
    let mut data = serde_json::Map::new();
    data.insert(field.to_string(), value);
    Value::Object(data)
}

fn respond(state: &FakeState, request: &Value) -> Value {
    let data = &state.data;
    let variables = &request["variables"];

    match request["operationName"].as_str().unwrap_or_default() {
        "Header" => json!({
            "shop": {"name": "Coffee Cup Hut", "primaryDomain": {"url": "https://coffeecuphut.com"}},
            "menu": data.menu.as_ref().map(|items| json!({"items": items}))
        }),
        "FeaturedCollection" => {
            let nodes = if data.has_collection {
                vec![json!({
                    "id": "gid://shopify/Collection/1",
                    "title": "Ceramic Mugs",
                    "handle": "ceramic-mugs",
                    "image": {"id": null, "url": "https://cdn.shopify.com/s/files/collection.png", "altText": "Mugs", "width": 1200, "height": 600}
                })]
            } else {
                vec![]
            };
            json!({"collections": {"nodes": nodes}})
        }
        "RecommendedProducts" => {
            let with_metafield = variables["withMetafield"].as_bool().unwrap_or(false);
            let nodes: Vec<Value> = data
                .recommended_tags
                .iter()
                .enumerate()
                .map(|(i, tag)| {
                    let tag = if with_metafield { tag.as_deref() } else { None };
                    product(i, tag)
                })
                .collect();
            json!({"products": {"nodes": nodes}})
        }
        "AllProducts" => {
            let (start, end) = page_window(data.catalog_size, variables);
            let nodes: Vec<Value> = (start..end).map(|i| product(i, None)).collect();
            json!({"products": {
                "nodes": nodes,
                "pageInfo": {
                    "hasPreviousPage": start > 0,
                    "hasNextPage": end < data.catalog_size,
                    "startCursor": (start < end).then(|| cursor(start)),
                    "endCursor": (start < end).then(|| cursor(end - 1))
                }
            }})
        }
        "Page" => {
            let page = match variables["handle"].as_str() {
                Some("contact") => json!({
                    "id": "gid://shopify/Page/1",
                    "handle": "contact",
                    "title": "Contact Us",
                    "body": "<p>Write to <strong>hello@coffeecuphut.com</strong></p>",
                    "seo": {"title": null, "description": null}
                }),
                _ => Value::Null,
            };
            json!({"page": page})
        }
        "CartSummary" => {
            let quantity = state
                .recorded()
                .cart_quantity
                .unwrap_or(data.existing_cart_quantity);
            json!({"cart": cart(variables["cartId"].as_str().unwrap_or_default(), quantity)})
        }
        "cartCreate" => cart_mutation(state, "cartCreate", &variables["input"]["lines"]),
        "cartLinesAdd" => cart_mutation(state, "cartLinesAdd", &variables["lines"]),
        other => return json!({"errors": [{"message": format!("unknown operation {other}")}]}),
    }
}

async fn graphql(
    State(state): State<FakeState>,
    Json(request): Json<Value>,
) -> Result<Json<Value>, axum::http::StatusCode> {
    state.recorded().requests.push(request.clone());

    if state.data.failing {
        return Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    let body = respond(&state, &request);
    if body.get("errors").is_some() {
        return Ok(Json(body));
    }
    Ok(Json(json!({ "data": body })))
}

// =============================================================================
// Test context
// =============================================================================

/// A running storefront wired to a fake Storefront API.
pub struct TestContext {
    /// Client with a cookie store, so the session cart id persists.
    pub client: Client,
    /// Storefront base URL, e.g. `http://127.0.0.1:41234`.
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });
    addr
}

/// Storefront configuration pointing at `api_url`.
#[must_use]
pub fn test_config(api_url: String, featured_filter: Option<MetafieldFilter>) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        shopify: ShopifyStorefrontConfig {
            store: "coffee-cup-hut.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: secrecy::SecretString::from("shpat_test_9f8e7d6c5b4a"),
            api_url: Some(api_url),
        },
        menu_handle: "main-menu".to_string(),
        default_locale: Locale::default(),
        featured_filter,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

impl TestContext {
    /// Start with no content filter.
    pub async fn start(data: FakeShopify) -> Self {
        Self::start_with_filter(data, None).await
    }

    /// Start both servers.
    pub async fn start_with_filter(data: FakeShopify, filter: Option<MetafieldFilter>) -> Self {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let fake = Router::new()
            .route("/graphql", post(graphql))
            .with_state(FakeState {
                data: Arc::new(data),
                recorded: Arc::clone(&recorded),
            });
        let fake_addr = serve(fake).await;

        let config = test_config(format!("http://{fake_addr}/graphql"), filter);
        let storefront_addr = serve(coffee_cup_hut_storefront::app(AppState::new(config))).await;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{storefront_addr}"),
            recorded,
        }
    }

    /// Absolute URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a storefront path.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Storefront request failed")
    }

    /// GET a storefront path as a fragment request.
    pub async fn get_fragment(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header(coffee_cup_hut_storefront::middleware::FRAGMENT_HEADER, "1")
            .send()
            .await
            .expect("Storefront request failed")
    }

    /// Every GraphQL request the fake backend has received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<Value> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .requests
            .clone()
    }

    /// Operation names of the recorded requests, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r["operationName"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// The last recorded request for `operation`.
    #[must_use]
    pub fn last_request(&self, operation: &str) -> Option<Value> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r["operationName"] == operation)
    }
}

// =============================================================================
// HTML helpers
// =============================================================================

/// Titles of the product cards in `html`, in document order.
#[must_use]
pub fn product_titles(html: &str) -> Vec<String> {
    html.split("class=\"product-card-title\">")
        .skip(1)
        .filter_map(|rest| rest.split('<').next())
        .map(str::to_string)
        .collect()
}

/// Unescaped `href` of the first link carrying `class`.
#[must_use]
pub fn link_href(html: &str, class: &str) -> Option<String> {
    let rest = html.split(&format!("class=\"{class}\" href=\"")).nth(1)?;
    let href = rest.split('"').next()?;
    Some(decode_entities(href))
}

/// Decode the character references askama emits: `&amp;`-style names and
/// decimal or hex numeric references such as `&#38;` and `&#x2f;`.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        decoded.push_str(rest.get(..start).unwrap_or_default());
        let after = rest.get(start + 1..).unwrap_or_default();
        let reference = after
            .find(';')
            .and_then(|end| Some((after.get(..end)?, after.get(end + 1..)?)));
        let character = reference.and_then(|(name, tail)| {
            let character = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| name.strip_prefix('#').map(str::parse::<u32>))
                    .and_then(Result::ok)
                    .and_then(char::from_u32),
            }?;
            Some((character, tail))
        });
        match character {
            Some((character, tail)) => {
                decoded.push(character);
                rest = tail;
            }
            None => {
                decoded.push('&');
                rest = after;
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

/// Inner HTML of the streamed fill for `slot`.
#[must_use]
pub fn deferred_fill(html: &str, slot: &str) -> Option<String> {
    let rest = html
        .split(&format!("<template data-deferred-fill=\"{slot}\">"))
        .nth(1)?;
    Some(rest.split("</template>").next()?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_forward_and_backward() {
        assert_eq!(page_window(20, &json!({"first": 8})), (0, 8));
        assert_eq!(page_window(20, &json!({"first": 8, "after": "cursor-7"})), (8, 16));
        assert_eq!(page_window(20, &json!({"first": 8, "after": "cursor-15"})), (16, 20));
        assert_eq!(page_window(20, &json!({"last": 8, "before": "cursor-8"})), (0, 8));
        assert_eq!(page_window(20, &json!({"last": 8, "before": "cursor-4"})), (0, 4));
    }

    #[test]
    fn test_html_helpers() {
        let html = r#"<h4 class="product-card-title">Mug 1</h4><a class="button load-more" href="/collections/all?direction=next&#38;cursor=cursor-7">"#;
        assert_eq!(product_titles(html), vec!["Mug 1".to_string()]);
        assert_eq!(
            link_href(html, "button load-more").as_deref(),
            Some("/collections/all?direction=next&cursor=cursor-7")
        );
        assert_eq!(
            deferred_fill("<template data-deferred-fill=\"cart-badge\">7</template>", "cart-badge").as_deref(),
            Some("7")
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a&#38;b&amp;c&#x2f;d&#X2F;e"), "a&b&c/d/e");
        assert_eq!(decode_entities("We couldn&#39;t"), "We couldn't");
        assert_eq!(decode_entities("fish & chips &bogus; &#;"), "fish & chips &bogus; &#;");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }
}
