//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /{locale}                  - Home page in a locale (e.g. /fr-ca)
//! GET  /health                    - Health check
//! GET  /theme.css                 - Theme tokens
//!
//! # Products
//! GET  /collections/all           - Product listing (?direction=&cursor=)
//! GET  /{locale}/collections/all
//!
//! # Content pages
//! GET  /pages/{handle}            - Shopify page
//! GET  /{locale}/pages/{handle}
//! GET  /pages                     - Missing handle (500)
//!
//! # Cart
//! GET  /cart                      - Redirect to checkout
//! POST /cart                      - Add lines (badge fragment or redirect)
//!
//! # Fragments
//! GET  /fragments/menu            - Header menu after a toggle
//! ```
//!
//! Product cards, collection cards, footer policies and the journal link
//! point at `/products/{handle}`, `/collections/{handle}`, `/collections`,
//! `/policies` and `/blogs/journal`. Those pages are not served here and
//! answer 404 without reaching Shopify.

pub mod cart;
pub mod collections;
pub mod home;
pub mod layout;
pub mod menu;
pub mod pages;
pub mod theme;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Routes that also exist under a `/{locale}` prefix.
fn localized_routes() -> Router<AppState> {
    Router::new()
        .route("/collections/all", get(collections::all))
        .route("/pages", get(pages::show))
        .route("/pages/{handle}", get(pages::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route("/{locale}", get(home::home))
        // Listing and content pages
        .merge(localized_routes())
        .nest("/{locale}", localized_routes())
        // Cart
        .route("/cart", get(cart::show).post(cart::update))
        // Fragments and assets
        .route("/fragments/menu", get(menu::toggle))
        .route("/theme.css", get(theme::stylesheet))
}
