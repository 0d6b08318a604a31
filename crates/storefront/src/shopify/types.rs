//! Domain types for Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw response
//! shapes the query documents decode into.

use coffee_cup_hut_core::Price;
use coffee_cup_hut_core::menu::MenuItem;
use coffee_cup_hut_core::pagination::PageInfo;
use url::form_urlencoded;

// =============================================================================
// Image Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Shopify image ID.
    pub id: Option<String>,
    /// Image URL (Shopify CDN).
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

/// Widths offered in responsive `srcset`s.
const SRCSET_WIDTHS: [u32; 5] = [200, 400, 600, 800, 1200];

impl Image {
    /// CDN URL resized to `width`, cropped to a square when `square` is set.
    #[must_use]
    pub fn sized_url(&self, width: u32, square: bool) -> String {
        let Ok(mut url) = url::Url::parse(&self.url) else {
            return self.url.clone();
        };
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !matches!(key.as_ref(), "width" | "height" | "crop"))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (key, value) in &retained {
                query.append_pair(key, value);
            }
            query.append_pair("width", &width.to_string());
            if square {
                query.append_pair("height", &width.to_string());
                query.append_pair("crop", "center");
            }
        }
        url.to_string()
    }

    /// `srcset` attribute value; widths larger than the original are skipped.
    #[must_use]
    pub fn srcset(&self, square: bool) -> String {
        let max = self
            .width
            .and_then(|w| u32::try_from(w).ok())
            .unwrap_or(u32::MAX);
        SRCSET_WIDTHS
            .iter()
            .filter(|&&w| w <= max)
            .map(|&w| format!("{} {w}w", self.sized_url(w, square)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// =============================================================================
// Shop & Menu
// =============================================================================

/// Shop identity shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shop {
    pub name: String,
    /// Primary domain URL, e.g. `https://coffeecuphut.com`.
    pub primary_domain_url: String,
}

/// Data for the layout header.
#[derive(Debug, Clone)]
pub struct Header {
    pub shop: Shop,
    /// `None` when the backend has no menu with the configured handle.
    pub menu: Option<Vec<MenuItem>>,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection as shown in the home page feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub image: Option<Image>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOption {
    /// Option name (e.g., "Color").
    pub name: String,
    /// Selected value (e.g., "Black").
    pub value: String,
}

/// A purchasable variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductVariant {
    pub id: String,
    pub selected_options: Vec<SelectedOption>,
}

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Price,
    /// Maximum price among all variants.
    pub max_variant_price: Option<Price>,
}

/// A product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub price_range: PriceRange,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub variants: Vec<ProductVariant>,
    /// Value of the configured tag metafield, when requested.
    pub metafield: Option<String>,
}

impl Product {
    /// The featured image, or the first gallery image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&Image> {
        self.featured_image.as_ref().or_else(|| self.images.first())
    }

    /// The variant the grid links to and the add-to-cart button adds.
    #[must_use]
    pub fn first_variant(&self) -> Option<&ProductVariant> {
        self.variants.first()
    }

    /// Product URL pre-selecting the first variant's options:
    /// `/products/<handle>?Color=Black`.
    #[must_use]
    pub fn variant_url(&self, path_prefix: &str) -> String {
        let mut url = format!("{path_prefix}/products/{}", self.handle);
        let Some(variant) = self.first_variant() else {
            return url;
        };
        if variant.selected_options.is_empty() {
            return url;
        }
        let mut query = form_urlencoded::Serializer::new(String::new());
        for option in &variant.selected_options {
            query.append_pair(&option.name, &option.value);
        }
        url.push('?');
        url.push_str(&query.finish());
        url
    }
}

/// One page of products.
#[derive(Debug, Clone)]
pub struct ProductConnection {
    pub products: Vec<Product>,
    pub page_info: PageInfo,
}

// =============================================================================
// Page Types
// =============================================================================

/// SEO metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seo {
    /// Page title for search engines.
    pub title: Option<String>,
    /// Meta description.
    pub description: Option<String>,
}

/// A content page authored in Shopify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub handle: String,
    pub title: String,
    /// Rich HTML body, rendered verbatim.
    pub body: String,
    pub seo: Seo,
}

// =============================================================================
// Cart Types
// =============================================================================

/// What the header needs to know about the visitor's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub id: String,
    pub total_quantity: i64,
    pub checkout_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(options: &[(&str, &str)]) -> Product {
        Product {
            id: "gid://shopify/Product/1".to_string(),
            handle: "black-mug".to_string(),
            title: "Black Mug".to_string(),
            price_range: PriceRange {
                min_variant_price: Price::parse("18", "USD").unwrap(),
                max_variant_price: None,
            },
            featured_image: None,
            images: vec![],
            variants: vec![ProductVariant {
                id: "gid://shopify/ProductVariant/11".to_string(),
                selected_options: options
                    .iter()
                    .map(|(name, value)| SelectedOption {
                        name: (*name).to_string(),
                        value: (*value).to_string(),
                    })
                    .collect(),
            }],
            metafield: None,
        }
    }

    #[test]
    fn test_variant_url_with_options() {
        let product = product(&[("Color", "Black"), ("Size", "15 oz")]);
        assert_eq!(
            product.variant_url(""),
            "/products/black-mug?Color=Black&Size=15+oz"
        );
        assert_eq!(
            product.variant_url("/fr-ca"),
            "/fr-ca/products/black-mug?Color=Black&Size=15+oz"
        );
    }

    #[test]
    fn test_variant_url_without_options() {
        assert_eq!(product(&[]).variant_url(""), "/products/black-mug");
    }

    #[test]
    fn test_sized_url_square_crop() {
        let image = Image {
            id: None,
            url: "https://cdn.shopify.com/s/files/mug.png?v=17".to_string(),
            alt_text: None,
            width: Some(500),
            height: Some(500),
        };
        assert_eq!(
            image.sized_url(400, true),
            "https://cdn.shopify.com/s/files/mug.png?v=17&width=400&height=400&crop=center"
        );
        assert_eq!(
            image.srcset(false),
            "https://cdn.shopify.com/s/files/mug.png?v=17&width=200 200w, \
             https://cdn.shopify.com/s/files/mug.png?v=17&width=400 400w"
        );
    }
}
