//! Locale extraction from the optional `/{locale}` path prefix.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use coffee_cup_hut_core::Locale;

use crate::error::AppError;
use crate::state::AppState;

/// The buyer locale for this request.
///
/// Taken from the `locale` path parameter on prefixed routes, otherwise the
/// configured default. A prefix that is not `xx-yy` is a 404, so stray
/// top-level paths like `/favicon.ico` never reach the backend.
#[derive(Debug, Clone)]
pub struct RequestLocale {
    pub locale: Locale,
    /// Whether the locale came from the URL, in which case links keep the
    /// prefix.
    pub prefixed: bool,
}

impl RequestLocale {
    /// Prefix for internal links: `/fr-ca` or empty.
    #[must_use]
    pub fn path_prefix(&self) -> String {
        if self.prefixed {
            self.locale.path_prefix()
        } else {
            String::new()
        }
    }
}

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RouteParams(params) = RouteParams::from_request_parts(parts, state).await?;

        match params.get("locale") {
            Some(segment) => {
                let locale = segment
                    .parse()
                    .map_err(|_| AppError::NotFound(format!("locale {segment}")))?;
                Ok(Self {
                    locale,
                    prefixed: true,
                })
            }
            None => Ok(Self {
                locale: state.config().default_locale.clone(),
                prefixed: false,
            }),
        }
    }
}

/// Path parameters of the matched route, empty when it has none.
///
/// The same handler serves `/pages/{handle}`, `/{locale}/pages/{handle}` and
/// the bare `/pages`, so parameters are looked up by name.
#[derive(Debug, Clone, Default)]
pub struct RouteParams(pub HashMap<String, String>);

impl RouteParams {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RouteParams {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(
            Path::<HashMap<String, String>>::from_request_parts(parts, state)
                .await
                .map(|Path(params)| params)
                .unwrap_or_default(),
        ))
    }
}

/// Header set by `storefront.js` when it wants only a fragment back.
pub const FRAGMENT_HEADER: &str = "x-fragment";

/// Whether the request asked for an HTML fragment instead of a full page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentRequest(pub bool);

impl<S: Send + Sync> FromRequestParts<S> for FragmentRequest {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.headers.contains_key(FRAGMENT_HEADER)))
    }
}
