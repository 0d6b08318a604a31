//! Cart route handlers.
//!
//! The storefront keeps only the Shopify cart id in the session. The first
//! add-to-cart creates the cart; later ones add lines to it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode, header::REFERER},
    response::{Html, IntoResponse, Redirect, Response},
};
use coffee_cup_hut_core::Locale;
use coffee_cup_hut_core::cart::{CartAction, CartLinesAdd};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, add_breadcrumb};
use crate::middleware::{CART_ID_KEY, FragmentRequest};
use crate::routes::layout::{CartBadgeTemplate, render_fragment, session_cart_id};
use crate::shopify::ShopifyError;
use crate::shopify::types::CartSummary;
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    /// Action discriminator; only `LinesAdd` is supported.
    pub action: String,
    /// JSON array of `{merchandiseId, quantity}`.
    #[serde(default)]
    pub lines: String,
    /// Locale segment of the page the form was on.
    pub locale: Option<String>,
}

/// Form-level error fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_error.html")]
pub struct CartErrorTemplate {
    pub message: String,
}

/// Message shown under the button when the backend call fails.
fn visitor_message(error: &ShopifyError) -> String {
    match error {
        ShopifyError::UserError(message) => message.clone(),
        _ => "We couldn't update your cart. Please try again.".to_string(),
    }
}

/// Apply a cart mutation.
///
/// Fragment requests (from `storefront.js`) get the updated badge; plain form
/// posts are redirected back to the page they came from. Failures answer
/// with an error fragment: 422 for rejected lines, 502 for transport errors.
///
/// # Errors
///
/// Returns `AppError::CartInput` (400) when the form cannot be interpreted.
#[instrument(skip(state, session, headers, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    fragment: FragmentRequest,
    headers: HeaderMap,
    Form(form): Form<CartForm>,
) -> Result<Response, AppError> {
    let CartAction::LinesAdd = form.action.parse::<CartAction>()?;
    let payload = CartLinesAdd::from_form_field(&form.lines)?;
    let locale = form
        .locale
        .as_deref()
        .and_then(|segment| segment.parse::<Locale>().ok())
        .unwrap_or_else(|| state.config().default_locale.clone());

    add_breadcrumb("cart", "Add to cart", None);

    let summary = match add_lines(&state, &session, &locale, payload).await {
        Ok(summary) => summary,
        Err(err) => {
            let message = visitor_message(&err);
            let status = AppError::Shopify(err).status();
            if status.is_server_error() {
                tracing::error!(status = %status, "Cart mutation failed");
            } else {
                tracing::warn!(status = %status, "Cart mutation rejected");
            }
            return Ok(error_response(status, message));
        }
    };

    if let Err(e) = session.insert(CART_ID_KEY, &summary.id).await {
        tracing::warn!(error = %e, "Failed to store cart id in session");
    }

    if fragment.0 {
        return Ok(Html(render_fragment(&CartBadgeTemplate {
            count: summary.total_quantity,
        }))
        .into_response());
    }
    Ok(Redirect::to(&back_url(&headers)).into_response())
}

async fn add_lines(
    state: &AppState,
    session: &Session,
    locale: &Locale,
    payload: CartLinesAdd,
) -> Result<CartSummary, ShopifyError> {
    match session_cart_id(session).await {
        Some(cart_id) => {
            state
                .storefront()
                .add_cart_lines(locale, &cart_id, payload.lines)
                .await
        }
        None => state.storefront().create_cart(locale, payload.lines).await,
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Html(render_fragment(&CartErrorTemplate { message }))).into_response()
}

/// Same-origin path of the page that posted the form, or `/`.
fn back_url(headers: &HeaderMap) -> String {
    headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .map(|url| match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        })
        .unwrap_or_else(|| "/".to_string())
}

/// Send the visitor to checkout, or to the listing when there is no cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    let Some(cart_id) = session_cart_id(&session).await else {
        return Redirect::to("/collections/all").into_response();
    };

    let locale = state.config().default_locale.clone();
    match state.storefront().cart(&locale, &cart_id).await {
        Ok(Some(cart)) => Redirect::to(&cart.checkout_url).into_response(),
        Ok(None) => Redirect::to("/collections/all").into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}
