//! Streamed HTML responses with deferred fields.
//!
//! A page is sent in two phases. The shell goes out as soon as the awaited
//! fields are known, with fallback markup in every deferred slot. Each
//! deferred field is then appended as a
//! `<template data-deferred-fill="id">` chunk in the order the fields
//! resolve, closed by a `data-deferred-end` marker. Once the marker is
//! parsed the template before it is complete, and `storefront.js` moves its
//! content into `[data-deferred-slot="id"]`. The document is closed after the last fill,
//! so every deferred field has been delivered by the time the response ends.

use std::convert::Infallible;
use std::future::Future;

use axum::body::{Body, Bytes};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use futures::stream::{self, FuturesUnordered, StreamExt};
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::{Instrument, Span};

use crate::shopify::ShopifyError;

/// Closing tags the shell leaves open for the fill chunks.
const DOCUMENT_TAIL: &str = "</body>\n</html>\n";

/// Failure of a deferred field.
#[derive(Debug, Error)]
pub enum DeferredError {
    #[error(transparent)]
    Shopify(#[from] ShopifyError),
    #[error("deferred task failed: {0}")]
    Join(#[from] JoinError),
}

/// A backend read started now and consumed later.
///
/// The future is spawned immediately so it runs while the shell renders.
pub struct Deferred<T> {
    handle: JoinHandle<Result<T, ShopifyError>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Start `future` on the runtime, inside the current tracing span.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, ShopifyError>> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future.instrument(Span::current())),
        }
    }

    /// Wait for the value.
    ///
    /// # Errors
    ///
    /// Returns the backend error, or `DeferredError::Join` if the task
    /// panicked.
    pub async fn resolve(self) -> Result<T, DeferredError> {
        Ok(self.handle.await??)
    }
}

/// One deferred slot: its id and a future producing the replacement markup.
pub struct DeferredSlot {
    id: &'static str,
    render: BoxFuture<'static, String>,
}

impl DeferredSlot {
    pub fn new<F>(id: &'static str, render: F) -> Self
    where
        F: Future<Output = String> + Send + 'static,
    {
        Self {
            id,
            render: Box::pin(render),
        }
    }
}

/// An HTML page streamed as shell, fills, and closing tags.
pub struct StreamingHtml {
    shell: String,
    slots: Vec<DeferredSlot>,
}

impl StreamingHtml {
    /// `shell` must be the rendered page up to (but not including) `</body>`.
    #[must_use]
    pub const fn new(shell: String, slots: Vec<DeferredSlot>) -> Self {
        Self { shell, slots }
    }
}

impl IntoResponse for StreamingHtml {
    fn into_response(self) -> Response {
        let shell = stream::once(async move { self.shell });

        let fills = self
            .slots
            .into_iter()
            .map(|slot| async move { fill_chunk(slot.id, &slot.render.await) })
            .collect::<FuturesUnordered<_>>();

        let tail = stream::once(async { DOCUMENT_TAIL.to_string() });

        let body = shell
            .chain(fills)
            .chain(tail)
            .map(|chunk| Ok::<_, Infallible>(Bytes::from(chunk)));

        (
            [(CONTENT_TYPE, "text/html; charset=utf-8")],
            Body::from_stream(body),
        )
            .into_response()
    }
}

fn fill_chunk(id: &str, html: &str) -> String {
    format!(
        "<template data-deferred-fill=\"{id}\">{html}</template>\
         <span data-deferred-end=\"{id}\" hidden></span>\n"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn body_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_fills_follow_shell_in_completion_order() {
        let slow = DeferredSlot::new("slow", async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            "slow value".to_string()
        });
        let fast = DeferredSlot::new("fast", async { "fast value".to_string() });

        let page = StreamingHtml::new("<html><body>shell".to_string(), vec![slow, fast]);
        let response = page.into_response();
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/html; charset=utf-8"
        );

        let body = body_of(response).await;
        assert!(body.starts_with("<html><body>shell"));
        let fast_at = body.find("data-deferred-fill=\"fast\"").unwrap();
        let slow_at = body.find("data-deferred-fill=\"slow\"").unwrap();
        assert!(fast_at < slow_at);
        assert!(body.ends_with(DOCUMENT_TAIL));
    }

    #[test]
    fn test_fill_chunk_ends_with_marker() {
        let chunk = fill_chunk("cart-badge", "Cart <span>7</span>");
        assert!(chunk.starts_with("<template data-deferred-fill=\"cart-badge\">Cart <span>7</span></template>"));
        assert!(chunk.ends_with("<span data-deferred-end=\"cart-badge\" hidden></span>\n"));
        assert!(chunk.find("</template>").unwrap() < chunk.find("data-deferred-end").unwrap());
    }

    #[tokio::test]
    async fn test_shell_without_slots_is_closed() {
        let body = body_of(StreamingHtml::new("<body>".to_string(), vec![]).into_response()).await;
        assert_eq!(body, format!("<body>{DOCUMENT_TAIL}"));
    }

    #[tokio::test]
    async fn test_deferred_resolves_value_and_error() {
        let ok = Deferred::spawn(async { Ok::<_, ShopifyError>(7) });
        assert_eq!(ok.resolve().await.unwrap(), 7);

        let failed = Deferred::<i64>::spawn(async { Err(ShopifyError::message("timeout")) });
        assert!(matches!(
            failed.resolve().await,
            Err(DeferredError::Shopify(_))
        ));
    }
}
