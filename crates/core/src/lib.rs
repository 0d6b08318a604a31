//! Coffee Cup Hut Core - Shared domain types and storefront logic.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no templates. Everything here is deterministic so it can be unit
//! tested without a running backend.
//!
//! # Modules
//!
//! - [`types`] - Money and locale value types
//! - [`menu`] - Navigation menu tree, dropdown state machine and link targets
//! - [`pagination`] - Cursor pagination request/variables/page info
//! - [`cart`] - Cart line payloads and add-to-cart submission state
//! - [`filter`] - Metafield tag filtering for product lists
//! - [`theme`] - Semantic color tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod filter;
pub mod menu;
pub mod pagination;
pub mod theme;
pub mod types;

pub use types::*;
