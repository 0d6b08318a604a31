//! Content page route handlers.
//!
//! Pages are authored in Shopify; the body is rich HTML rendered verbatim.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequestLocale, RouteParams};
use crate::routes::layout::{Layout, LayoutView, PageMeta, cart_badge_slot, render_shell};
use crate::shopify::types::Page;
use crate::state::AppState;
use crate::streaming::StreamingHtml;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/show.html")]
pub struct PageShowTemplate {
    pub layout: LayoutView,
    pub meta: PageMeta,
    pub page: Page,
}

/// Title and description for a content page.
///
/// Known pages get a fixed description; any other page keeps the default.
#[must_use]
pub fn page_meta(page: &Page) -> PageMeta {
    let meta = PageMeta::titled(format!("Coffee Cup Hut | {}", page.title));
    let description = match page.title.as_str() {
        "Contact Us" => Some(
            "Connect with Coffee Cup Hut today! Have questions about our 15 oz ceramic mugs or \
             tumblers? Our team is here to help. Visit now!",
        ),
        "A Journey of Caffeinated Creativity" => Some(
            "Discover Coffee Cup Hut's story, your destination for 15 oz ceramic mugs & \
             tumblers. Learn about our passion for quality & style. Visit now!",
        ),
        "Coffee Cup Hut Return Policy" => Some(
            "Discover Coffee Cup Hut's hassle-free return policy for our 15 oz ceramic mugs & \
             tumblers. Shop with confidence knowing we've got you covered.",
        ),
        _ => None,
    };
    match description {
        Some(description) => meta.with_description(description),
        None => meta,
    }
}

/// Display a content page by handle.
///
/// Also mounted without a handle, where it fails before any backend call.
///
/// # Errors
///
/// Returns `MissingParameter` (500) without a handle and `NotFound` (404)
/// when the shop has no such page.
#[instrument(skip(state, session, params))]
pub async fn show(
    State(state): State<AppState>,
    locale: RequestLocale,
    session: Session,
    params: RouteParams,
) -> Result<Response, AppError> {
    let handle = params
        .get("handle")
        .ok_or_else(|| AppError::MissingParameter("page handle".to_string()))?
        .to_string();

    let page = async {
        state
            .storefront()
            .page(&locale.locale, &handle)
            .await
            .map_err(AppError::from)
    };

    let (layout, page) = tokio::try_join!(Layout::load(&state, &locale, &session), page)?;

    let shell = render_shell(&PageShowTemplate {
        layout: layout.view,
        meta: page_meta(&page),
        page,
    })?;

    Ok(StreamingHtml::new(shell, vec![cart_badge_slot(layout.cart_count)]).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::types::Seo;

    fn page(title: &str) -> Page {
        Page {
            id: "gid://shopify/Page/1".to_string(),
            handle: "contact".to_string(),
            title: title.to_string(),
            body: "<p>Hello</p>".to_string(),
            seo: Seo::default(),
        }
    }

    #[test]
    fn test_page_meta_known_titles() {
        let meta = page_meta(&page("Contact Us"));
        assert_eq!(meta.title, "Coffee Cup Hut | Contact Us");
        assert!(meta.description.unwrap().starts_with("Connect with Coffee Cup Hut today!"));

        let meta = page_meta(&page("Coffee Cup Hut Return Policy"));
        assert!(meta.description.unwrap().contains("hassle-free return policy"));
    }

    #[test]
    fn test_page_meta_default() {
        let meta = page_meta(&page("Shipping"));
        assert_eq!(meta.title, "Coffee Cup Hut | Shipping");
        assert_eq!(meta.description, None);
    }
}
