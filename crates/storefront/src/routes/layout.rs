//! Shared page chrome: the layout loader, header menu and cart badge.
//!
//! Every full page awaits the header query and defers the cart summary, so
//! the shell never waits on the visitor's cart.

use askama::Template;
use askama_web::WebTemplate;
use coffee_cup_hut_core::menu::{MenuItem, MenuLink, MenuState, StoreDomains};
use tower_sessions::Session;
use tracing::instrument;
use url::form_urlencoded;

use crate::error::AppError;
use crate::middleware::{CART_ID_KEY, RequestLocale};
use crate::shopify::Header;
use crate::state::AppState;
use crate::streaming::{Deferred, DeferredSlot};

/// Slot id of the header cart badge.
pub const CART_BADGE_SLOT: &str = "cart-badge";

/// Shown in every deferred slot until its fill arrives.
pub const LOADING_FALLBACK: &str = "Loading...";

// =============================================================================
// Page metadata
// =============================================================================

/// `<title>` and meta description for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: Option<String>,
}

impl PageMeta {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Menu views
// =============================================================================

/// One rendered menu entry.
#[derive(Debug, Clone)]
pub struct MenuEntryView {
    pub id: String,
    pub title: String,
    pub href: String,
    pub expandable: bool,
    pub open: bool,
    /// Fragment URL answering with the menu after toggling this entry.
    pub toggle_url: String,
    pub children: Vec<MenuEntryView>,
}

/// The header navigation at a given open state.
#[derive(Debug, Clone, Default)]
pub struct MenuView {
    pub entries: Vec<MenuEntryView>,
}

impl MenuView {
    /// Build the view for `items` with `state` applied.
    ///
    /// Items without a URL are skipped along with their children.
    #[must_use]
    pub fn build(
        items: &[MenuItem],
        state: &MenuState,
        domains: &StoreDomains,
        locale: &RequestLocale,
    ) -> Self {
        let context = MenuContext {
            state,
            domains,
            locale,
        };
        Self {
            entries: context.entries(items, 0),
        }
    }
}

struct MenuContext<'a> {
    state: &'a MenuState,
    domains: &'a StoreDomains,
    locale: &'a RequestLocale,
}

impl MenuContext<'_> {
    fn entries(&self, items: &[MenuItem], depth: usize) -> Vec<MenuEntryView> {
        items
            .iter()
            .filter_map(|item| {
                let link = item.link();
                let url = link.url.as_deref()?;
                Some(MenuEntryView {
                    id: link.id.clone(),
                    title: link.title.clone(),
                    href: self.domains.link_target(url),
                    expandable: item.is_expandable(),
                    open: self.state.is_open(depth, &link.id),
                    toggle_url: self.toggle_url(&link.id),
                    children: self.entries(item.children(), depth + 1),
                })
            })
            .collect()
    }

    fn toggle_url(&self, id: &str) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("open", &self.state.to_param());
        query.append_pair("select", id);
        if self.locale.prefixed {
            query.append_pair("locale", &self.locale.locale.to_string());
        }
        format!("/fragments/menu?{}", query.finish())
    }
}

/// Navigation used when the shop has no menu with the configured handle.
#[must_use]
pub fn fallback_menu() -> Vec<MenuItem> {
    [
        ("gid://shopify/MenuItem/461609500728", "Collections", "/collections"),
        ("gid://shopify/MenuItem/461609533496", "Blog", "/blogs/journal"),
        ("gid://shopify/MenuItem/461609566264", "Policies", "/policies"),
        ("gid://shopify/MenuItem/461609599032", "About", "/pages/about"),
    ]
    .into_iter()
    .map(|(id, title, url)| {
        MenuItem::new(
            MenuLink {
                id: id.to_string(),
                title: title.to_string(),
                url: Some(url.to_string()),
            },
            Vec::new(),
        )
    })
    .collect()
}

/// Header navigation, also served alone by `/fragments/menu`.
#[derive(Template, WebTemplate)]
#[template(path = "partials/menu.html")]
pub struct MenuTemplate {
    pub menu: MenuView,
}

// =============================================================================
// Cart badge
// =============================================================================

/// Header cart badge content.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_badge.html")]
pub struct CartBadgeTemplate {
    pub count: i64,
}

/// Fill for the cart badge slot. Any failure degrades to `0`.
pub fn cart_badge_slot(count: Deferred<i64>) -> DeferredSlot {
    DeferredSlot::new(CART_BADGE_SLOT, async move {
        let count = count.resolve().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cart summary unavailable, showing 0");
            0
        });
        render_fragment(&CartBadgeTemplate { count })
    })
}

/// Render a fill or fragment; failures are logged and leave the slot empty.
pub fn render_fragment<T: Template>(template: &T) -> String {
    template.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to render fragment");
        String::new()
    })
}

/// Render a page shell.
///
/// # Errors
///
/// Returns `AppError::Internal` if the template fails to render.
pub fn render_shell<T: Template>(template: &T) -> Result<String, AppError> {
    template
        .render()
        .map_err(|e| AppError::Internal(format!("template render failed: {e}")))
}

// =============================================================================
// Layout loader
// =============================================================================

/// Data every full page template carries.
#[derive(Debug, Clone)]
pub struct LayoutView {
    pub shop_name: String,
    /// `/fr-ca` on prefixed routes, otherwise empty.
    pub path_prefix: String,
    /// Locale segment for forms posting to unprefixed endpoints.
    pub locale: String,
    /// Rendered header navigation.
    pub menu_html: String,
}

impl LayoutView {
    /// Home link for the current locale.
    #[must_use]
    pub fn home_href(&self) -> String {
        if self.path_prefix.is_empty() {
            "/".to_string()
        } else {
            self.path_prefix.clone()
        }
    }
}

/// Result of the layout loader.
pub struct Layout {
    pub view: LayoutView,
    /// Total quantity in the visitor's cart, resolved after the shell.
    pub cart_count: Deferred<i64>,
}

impl Layout {
    /// Await the header and start the cart summary read.
    ///
    /// # Errors
    ///
    /// Returns an error if the header query fails.
    #[instrument(skip_all, fields(locale = %locale.locale))]
    pub async fn load(
        state: &AppState,
        locale: &RequestLocale,
        session: &Session,
    ) -> Result<Self, AppError> {
        let cart_count = spawn_cart_count(state, locale, session).await;

        let header = state
            .storefront()
            .header(&locale.locale, &state.config().menu_handle)
            .await?;

        Ok(Self {
            view: layout_view(state, locale, header),
            cart_count,
        })
    }
}

fn layout_view(state: &AppState, locale: &RequestLocale, header: Header) -> LayoutView {
    let items = header.menu.unwrap_or_else(fallback_menu);
    let domains = state.domains(&header.shop.primary_domain_url);
    let menu = MenuView::build(&items, &MenuState::collapsed(), &domains, locale);

    LayoutView {
        shop_name: header.shop.name,
        path_prefix: locale.path_prefix(),
        locale: locale.locale.to_string(),
        menu_html: render_fragment(&MenuTemplate { menu }),
    }
}

/// The visitor's cart id, if they have added anything this session.
pub async fn session_cart_id(session: &Session) -> Option<String> {
    session.get::<String>(CART_ID_KEY).await.ok().flatten()
}

async fn spawn_cart_count(
    state: &AppState,
    locale: &RequestLocale,
    session: &Session,
) -> Deferred<i64> {
    let cart_id = session_cart_id(session).await;
    let client = state.storefront().clone();
    let locale = locale.locale.clone();

    Deferred::spawn(async move {
        let Some(cart_id) = cart_id else {
            return Ok(0);
        };
        let cart = client.cart(&locale, &cart_id).await?;
        Ok(cart.map_or(0, |cart| cart.total_quantity))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffee_cup_hut_core::Locale;

    use super::*;

    fn item(id: &str, url: Option<&str>, children: Vec<MenuItem>) -> MenuItem {
        MenuItem::new(
            MenuLink {
                id: id.to_string(),
                title: id.to_uppercase(),
                url: url.map(String::from),
            },
            children,
        )
    }

    fn menu() -> Vec<MenuItem> {
        vec![
            item(
                "shop",
                Some("https://coffeecuphut.com/collections"),
                vec![
                    item("mugs", Some("/collections/mugs"), vec![]),
                    item("draft", None, vec![]),
                ],
            ),
            item("journal", Some("https://medium.com/@cch"), vec![]),
        ]
    }

    fn default_locale() -> RequestLocale {
        RequestLocale {
            locale: Locale::default(),
            prefixed: false,
        }
    }

    #[test]
    fn test_build_resolves_links_and_skips_items_without_url() {
        let domains = StoreDomains::new(["https://coffeecuphut.com"]);
        let view = MenuView::build(&menu(), &MenuState::collapsed(), &domains, &default_locale());

        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].href, "/collections");
        assert!(view.entries[0].expandable);
        assert!(!view.entries[0].open);
        assert_eq!(view.entries[0].children.len(), 1);
        assert_eq!(view.entries[1].href, "https://medium.com/@cch");
    }

    #[test]
    fn test_build_marks_open_entry_and_toggle_urls() {
        let domains = StoreDomains::default();
        let state = MenuState::collapsed().select(&menu(), "shop");
        let locale = RequestLocale {
            locale: "fr-ca".parse().unwrap(),
            prefixed: true,
        };
        let view = MenuView::build(&menu(), &state, &domains, &locale);

        assert!(view.entries[0].open);
        assert_eq!(
            view.entries[0].toggle_url,
            "/fragments/menu?open=shop&select=shop&locale=fr-ca"
        );
    }

    #[test]
    fn test_menu_template_renders_open_children_only() {
        let domains = StoreDomains::default();
        let collapsed = MenuView::build(&menu(), &MenuState::collapsed(), &domains, &default_locale());
        let html = MenuTemplate { menu: collapsed }.render().unwrap();
        assert!(html.contains("id=\"header-menu\""));
        assert!(!html.contains("MUGS"));

        let state = MenuState::collapsed().select(&menu(), "shop");
        let open = MenuView::build(&menu(), &state, &domains, &default_locale());
        let html = MenuTemplate { menu: open }.render().unwrap();
        assert!(html.contains("MUGS"));
        assert!(!html.contains("DRAFT"));
    }

    #[test]
    fn test_fallback_menu() {
        let items = fallback_menu();
        let titles: Vec<_> = items.iter().map(|i| i.link().title.as_str()).collect();
        assert_eq!(titles, ["Collections", "Blog", "Policies", "About"]);
        assert!(items.iter().all(|i| !i.is_expandable()));
    }

    #[tokio::test]
    async fn test_cart_badge_unresolved_and_resolved() {
        let html = CartBadgeTemplate { count: 0 }.render().unwrap();
        assert!(html.contains(">0<"));

        let slot = cart_badge_slot(Deferred::spawn(async { Ok(7) }));
        let body = crate::streaming::StreamingHtml::new(String::new(), vec![slot]);
        let response = axum::response::IntoResponse::into_response(body);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("data-deferred-fill=\"cart-badge\""));
        assert!(html.contains(">7<"));
    }

    #[tokio::test]
    async fn test_cart_badge_failure_degrades_to_zero() {
        let slot = cart_badge_slot(Deferred::spawn(async {
            Err(crate::shopify::ShopifyError::message("down"))
        }));
        let response = axum::response::IntoResponse::into_response(
            crate::streaming::StreamingHtml::new(String::new(), vec![slot]),
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8(bytes.to_vec()).unwrap().contains(">0<"));
    }
}
