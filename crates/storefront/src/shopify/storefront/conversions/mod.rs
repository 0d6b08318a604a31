//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod collections;
pub mod header;
pub mod pages;
pub mod products;

pub use cart::{convert_cart_mutation, convert_cart_summary};
pub use collections::convert_collection;
pub use header::convert_header;
pub use pages::convert_page;
pub use products::{convert_product, convert_product_connection};
