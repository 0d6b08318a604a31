//! Header menu toggle fragment.
//!
//! The open state is never stored. Each toggle request carries the current
//! state and the selected id; the answer is the re-rendered navigation whose
//! toggle links carry the next state.

use axum::extract::{Query, State};
use coffee_cup_hut_core::menu::MenuState;
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequestLocale;
use crate::routes::layout::{MenuTemplate, MenuView, fallback_menu};
use crate::state::AppState;

/// Toggle request parameters.
#[derive(Debug, Deserialize)]
pub struct MenuToggleQuery {
    /// Currently open ids, outermost first, comma-separated.
    #[serde(default)]
    pub open: String,
    /// Id of the item that was clicked.
    pub select: Option<String>,
    /// Locale segment of the page showing the menu.
    pub locale: Option<String>,
}

/// Re-render the header navigation after a toggle.
///
/// # Errors
///
/// Returns `NotFound` for a malformed locale, or an error if the header
/// query fails.
#[instrument(skip(state))]
pub async fn toggle(
    State(state): State<AppState>,
    Query(query): Query<MenuToggleQuery>,
) -> Result<MenuTemplate, AppError> {
    let locale = match query.locale.as_deref() {
        Some(segment) => RequestLocale {
            locale: segment
                .parse()
                .map_err(|_| AppError::NotFound(format!("locale {segment}")))?,
            prefixed: true,
        },
        None => RequestLocale {
            locale: state.config().default_locale.clone(),
            prefixed: false,
        },
    };

    let header = state
        .storefront()
        .header(&locale.locale, &state.config().menu_handle)
        .await?;
    let items = header.menu.unwrap_or_else(fallback_menu);

    let current = MenuState::from_param(&query.open).sanitize(&items);
    let next = match query.select.as_deref() {
        Some(id) => current.select(&items, id),
        None => current,
    };

    let domains = state.domains(&header.shop.primary_domain_url);
    Ok(MenuTemplate {
        menu: MenuView::build(&items, &next, &domains, &locale),
    })
}
