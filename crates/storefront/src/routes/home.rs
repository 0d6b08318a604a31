//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use coffee_cup_hut_core::filter::MetafieldFilter;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequestLocale;
use crate::routes::collections::{ImageView, ProductCardView};
use crate::routes::layout::{
    LOADING_FALLBACK, Layout, LayoutView, PageMeta, cart_badge_slot, render_fragment,
    render_shell,
};
use crate::shopify::types::{Collection, Product};
use crate::state::AppState;
use crate::streaming::{Deferred, DeferredError, DeferredSlot, StreamingHtml};

/// Slot id of the recommended products grid.
pub const RECOMMENDED_SLOT: &str = "recommended-products";

// =============================================================================
// Hero
// =============================================================================

/// A hero call to action.
#[derive(Debug, Clone)]
pub struct HeroButton {
    pub label: &'static str,
    pub href: String,
}

/// The slanted hero at the top of the home page.
#[derive(Debug, Clone)]
pub struct HeroView {
    pub title: &'static str,
    pub body: &'static str,
    pub image_path: &'static str,
    pub image_alt: &'static str,
    pub buttons: Vec<HeroButton>,
}

impl HeroView {
    #[must_use]
    pub fn new(path_prefix: &str) -> Self {
        Self {
            title: "Find Your Perfect Coffee Companion",
            body: "Dive into our exclusive selection of coffee cups, each crafted to perfect \
                   your daily coffee ritual. Whether you're seeking sophistication or practical \
                   innovation, your next favorite coffee companion awaits.",
            image_path: "/static/images/hero-cups.svg",
            image_alt: "Two coffee cups on a counter",
            buttons: vec![
                HeroButton {
                    label: "Shop",
                    href: format!("{path_prefix}/collections/all"),
                },
                HeroButton {
                    label: "About Us",
                    href: format!("{path_prefix}/pages/about"),
                },
            ],
        }
    }
}

// =============================================================================
// Views
// =============================================================================

/// The featured collection card.
#[derive(Debug, Clone)]
pub struct CollectionCardView {
    pub title: String,
    pub url: String,
    pub image: Option<ImageView>,
}

impl CollectionCardView {
    #[must_use]
    pub fn new(collection: &Collection, path_prefix: &str) -> Self {
        Self {
            title: collection.title.clone(),
            url: format!("{path_prefix}/collections/{}", collection.handle),
            image: collection
                .image
                .as_ref()
                .map(|image| ImageView::natural(image, &collection.title)),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    pub meta: PageMeta,
    pub hero: HeroView,
    pub featured: Option<CollectionCardView>,
    pub loading: &'static str,
}

/// Fill for the recommended products slot.
#[derive(Template, WebTemplate)]
#[template(path = "partials/recommended_products.html")]
pub struct RecommendedProductsTemplate {
    pub products: Vec<ProductCardView>,
    pub failed: bool,
}

impl RecommendedProductsTemplate {
    /// Build from the resolved list, applying the optional tag filter.
    #[must_use]
    pub fn resolved(
        result: Result<Vec<Product>, DeferredError>,
        filter: Option<&MetafieldFilter>,
        locale: &RequestLocale,
    ) -> Self {
        match result {
            Ok(products) => {
                let products = match filter {
                    Some(filter) => filter.apply(products, |p| p.metafield.as_deref()),
                    None => products,
                };
                Self {
                    products: products
                        .iter()
                        .map(|product| {
                            ProductCardView::new(product, locale, false)
                                .with_add_to_cart(product, locale)
                        })
                        .collect(),
                    failed: false,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load recommended products");
                Self {
                    products: Vec::new(),
                    failed: true,
                }
            }
        }
    }
}

fn recommended_slot(
    products: Deferred<Vec<Product>>,
    filter: Option<MetafieldFilter>,
    locale: RequestLocale,
) -> DeferredSlot {
    DeferredSlot::new(RECOMMENDED_SLOT, async move {
        let template =
            RecommendedProductsTemplate::resolved(products.resolve().await, filter.as_ref(), &locale);
        render_fragment(&template)
    })
}

// =============================================================================
// Handler
// =============================================================================

/// Display the home page.
///
/// The featured collection is awaited; recommended products and the cart
/// badge stream in after the shell.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    locale: RequestLocale,
    session: Session,
) -> Result<Response, AppError> {
    let filter = state.config().featured_filter.clone();

    let recommended = {
        let client = state.storefront().clone();
        let locale = locale.locale.clone();
        let filter = filter.clone();
        Deferred::spawn(async move { client.recommended_products(&locale, filter.as_ref()).await })
    };

    let featured = async {
        state
            .storefront()
            .featured_collection(&locale.locale)
            .await
            .map_err(AppError::from)
    };

    let (layout, featured) =
        tokio::try_join!(Layout::load(&state, &locale, &session), featured)?;

    let path_prefix = locale.path_prefix();
    let shell = render_shell(&HomeTemplate {
        layout: layout.view,
        meta: PageMeta::titled("Coffee Cup Hut"),
        hero: HeroView::new(&path_prefix),
        featured: featured.map(|c| CollectionCardView::new(&c, &path_prefix)),
        loading: LOADING_FALLBACK,
    })?;

    Ok(StreamingHtml::new(
        shell,
        vec![
            cart_badge_slot(layout.cart_count),
            recommended_slot(recommended, filter, locale),
        ],
    )
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffee_cup_hut_core::{Locale, Price};

    use super::*;
    use crate::shopify::ShopifyError;
    use crate::shopify::types::{PriceRange, ProductVariant};

    fn product(handle: &str, tag: Option<&str>) -> Product {
        Product {
            id: format!("gid://shopify/Product/{handle}"),
            handle: handle.to_string(),
            title: handle.to_string(),
            price_range: PriceRange {
                min_variant_price: Price::parse("24.5", "USD").unwrap(),
                max_variant_price: None,
            },
            featured_image: None,
            images: vec![],
            variants: vec![ProductVariant {
                id: format!("gid://shopify/ProductVariant/{handle}"),
                selected_options: vec![],
            }],
            metafield: tag.map(String::from),
        }
    }

    fn locale() -> RequestLocale {
        RequestLocale {
            locale: Locale::default(),
            prefixed: false,
        }
    }

    fn four_products() -> Vec<Product> {
        vec![
            product("white-mug", Some("signature")),
            product("black-mug", None),
            product("tumbler", Some("signature")),
            product("espresso-cup", Some("seasonal")),
        ]
    }

    #[test]
    fn test_filter_keeps_matching_products() {
        let filter = MetafieldFilter::parse("custom.collection_tag", "signature").unwrap();
        let template =
            RecommendedProductsTemplate::resolved(Ok(four_products()), Some(&filter), &locale());

        let titles: Vec<_> = template.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["white-mug", "tumbler"]);

        let html = template.render().unwrap();
        assert_eq!(html.matches("class=\"product-card\"").count(), 2);
        assert_eq!(html.matches("Add to cart").count(), 2);
    }

    #[test]
    fn test_filter_without_matches_renders_empty_state() {
        let filter = MetafieldFilter::parse("custom.collection_tag", "limited").unwrap();
        let template =
            RecommendedProductsTemplate::resolved(Ok(four_products()), Some(&filter), &locale());

        let html = template.render().unwrap();
        assert!(html.contains("No recommended products found."));
        assert!(!html.contains("product-card"));
    }

    #[test]
    fn test_unfiltered_list_renders_all() {
        let template = RecommendedProductsTemplate::resolved(Ok(four_products()), None, &locale());
        assert_eq!(template.products.len(), 4);
        assert_eq!(template.products[0].price, "$24.50");
    }

    #[test]
    fn test_failure_renders_inline_message() {
        let template = RecommendedProductsTemplate::resolved(
            Err(DeferredError::Shopify(ShopifyError::message("timeout"))),
            None,
            &locale(),
        );
        let html = template.render().unwrap();
        assert!(html.contains("could not be loaded"));
    }

    #[test]
    fn test_hero_links_keep_locale_prefix() {
        let hero = HeroView::new("/fr-ca");
        let hrefs: Vec<_> = hero.buttons.iter().map(|b| b.href.as_str()).collect();
        assert_eq!(hrefs, ["/fr-ca/collections/all", "/fr-ca/pages/about"]);
    }
}
