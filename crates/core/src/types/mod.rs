//! Core value types for the storefront.

pub mod locale;
pub mod price;

pub use locale::{Locale, LocaleError};
pub use price::{CurrencyCode, Price, PriceError};
