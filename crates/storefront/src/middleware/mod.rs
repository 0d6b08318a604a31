//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//! 5. Security headers (CSP, frame denial, etc.)
//!
//! Locale and fragment detection are extractors rather than layers.

pub mod locale;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use locale::{FRAGMENT_HEADER, FragmentRequest, RequestLocale, RouteParams};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{CART_ID_KEY, create_session_layer};
