//! Theme stylesheet.

use axum::{
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use coffee_cup_hut_core::theme::Theme;

/// Serve the color tokens as CSS custom properties and utility classes.
pub async fn stylesheet() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        Theme::COFFEE_CUP_HUT.to_css(),
    )
}
