//! Product listing route handlers and shared product card views.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use coffee_cup_hut_core::cart::{CartAction, CartLinesAdd};
use coffee_cup_hut_core::pagination::PaginationQuery;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{FragmentRequest, RequestLocale};
use crate::routes::layout::{
    Layout, LayoutView, PageMeta, cart_badge_slot, render_fragment, render_shell,
};
use crate::shopify::types::{Image, Product, ProductConnection};
use crate::state::AppState;
use crate::streaming::StreamingHtml;

/// Products per listing page.
pub const PAGE_BY: i64 = 8;

/// Leading grid images loaded eagerly.
const EAGER_IMAGES: usize = 8;

const TITLE: &str = "Coffee Cup Hut | All Products";
const DESCRIPTION: &str = "Browse premium coffee mugs & tumblers. Discover elegant white & sleek black 15 oz ceramic mugs alongside stylish tumblers. Shop now!";

// =============================================================================
// Views
// =============================================================================

/// Image display data for templates.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub src: String,
    pub srcset: String,
    pub alt: String,
}

impl ImageView {
    /// Square-cropped CDN rendition, as the product grid shows it.
    #[must_use]
    pub fn square(image: &Image, fallback_alt: &str) -> Self {
        Self {
            src: image.sized_url(400, true),
            srcset: image.srcset(true),
            alt: image
                .alt_text
                .clone()
                .unwrap_or_else(|| fallback_alt.to_string()),
        }
    }

    /// Uncropped rendition.
    #[must_use]
    pub fn natural(image: &Image, fallback_alt: &str) -> Self {
        Self {
            src: image.sized_url(1200, false),
            srcset: image.srcset(false),
            alt: image
                .alt_text
                .clone()
                .unwrap_or_else(|| fallback_alt.to_string()),
        }
    }
}

/// The add-to-cart form for one variant.
#[derive(Debug, Clone)]
pub struct AddToCartView {
    pub action: &'static str,
    /// JSON `lines` field.
    pub lines: String,
    pub locale: String,
    pub disabled: bool,
}

impl AddToCartView {
    /// Form adding one unit of the product's first variant. Products without
    /// a variant get a disabled button; otherwise the button is rendered
    /// enabled and `storefront.js` disables it while a submission is in
    /// flight.
    #[must_use]
    pub fn for_product(product: &Product, locale: &RequestLocale) -> Self {
        let variant = product.first_variant();
        let lines = variant.map_or_else(String::new, |v| {
            CartLinesAdd::single_variant(&v.id).to_form_field()
        });

        Self {
            action: CartAction::LinesAdd.as_str(),
            lines,
            locale: locale.locale.to_string(),
            disabled: variant.is_none(),
        }
    }
}

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub title: String,
    /// Product URL pre-selecting the first variant.
    pub url: String,
    /// Minimum variant price.
    pub price: String,
    pub image: Option<ImageView>,
    pub eager: bool,
    pub add_to_cart: Option<AddToCartView>,
}

impl ProductCardView {
    #[must_use]
    pub fn new(product: &Product, locale: &RequestLocale, eager: bool) -> Self {
        Self {
            title: product.title.clone(),
            url: product.variant_url(&locale.path_prefix()),
            price: product.price_range.min_variant_price.to_string(),
            image: product
                .primary_image()
                .map(|image| ImageView::square(image, &product.title)),
            eager,
            add_to_cart: None,
        }
    }

    /// Attach an add-to-cart button.
    #[must_use]
    pub fn with_add_to_cart(mut self, product: &Product, locale: &RequestLocale) -> Self {
        self.add_to_cart = Some(AddToCartView::for_product(product, locale));
        self
    }
}

/// One page of the listing with its pagination controls.
#[derive(Debug, Clone)]
pub struct ProductListingView {
    pub products: Vec<ProductCardView>,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl ProductListingView {
    #[must_use]
    pub fn new(connection: &ProductConnection, locale: &RequestLocale) -> Self {
        let base = format!("{}/collections/all", locale.path_prefix());
        let link = |query: PaginationQuery| format!("{base}?{}", query.to_query_string());

        Self {
            products: connection
                .products
                .iter()
                .enumerate()
                .map(|(i, product)| ProductCardView::new(product, locale, i < EAGER_IMAGES))
                .collect(),
            previous_url: connection.page_info.previous().map(link),
            next_url: connection.page_info.next().map(link),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// All products page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/all.html")]
pub struct CollectionsAllTemplate {
    pub layout: LayoutView,
    pub meta: PageMeta,
    pub listing: ProductListingView,
}

/// Listing fragment, answered to pagination requests from `storefront.js`.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_listing.html")]
pub struct ProductListingTemplate {
    pub listing: ProductListingView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display one page of all products.
///
/// `direction=previous&cursor=C` loads the page before `C`; anything else
/// loads the page after the optional cursor.
#[instrument(skip(state, session, fragment))]
pub async fn all(
    State(state): State<AppState>,
    locale: RequestLocale,
    fragment: FragmentRequest,
    session: Session,
    Query(query): Query<PaginationQuery>,
) -> Result<Response, AppError> {
    let products = async {
        state
            .storefront()
            .all_products(&locale.locale, query.variables(PAGE_BY))
            .await
            .map_err(AppError::from)
    };

    if fragment.0 {
        let connection = products.await?;
        let listing = ProductListingView::new(&connection, &locale);
        return Ok(Html(render_fragment(&ProductListingTemplate { listing })).into_response());
    }

    let (layout, connection) =
        tokio::try_join!(Layout::load(&state, &locale, &session), products)?;

    let shell = render_shell(&CollectionsAllTemplate {
        layout: layout.view,
        meta: PageMeta::titled(TITLE).with_description(DESCRIPTION),
        listing: ProductListingView::new(&connection, &locale),
    })?;

    Ok(StreamingHtml::new(shell, vec![cart_badge_slot(layout.cart_count)]).into_response())
}
