//! Product type conversion functions.

use coffee_cup_hut_core::Price;

use crate::shopify::ShopifyError;
use crate::shopify::types::{
    Image, PriceRange, Product, ProductConnection, ProductVariant, SelectedOption,
};

use super::super::queries::{all_products, common};

pub fn convert_image(image: common::Image) -> Image {
    Image {
        id: image.id,
        url: image.url,
        alt_text: image.alt_text,
        width: image.width,
        height: image.height,
    }
}

fn convert_money(money: &common::MoneyV2) -> Result<Price, ShopifyError> {
    Price::parse(&money.amount, &money.currency_code)
        .map_err(|e| ShopifyError::message(format!("invalid price from Shopify: {e}")))
}

/// Convert a product node.
///
/// # Errors
///
/// Returns an error if a price amount is not a decimal number.
pub fn convert_product(product: common::Product) -> Result<Product, ShopifyError> {
    let price_range = PriceRange {
        min_variant_price: convert_money(&product.price_range.min_variant_price)?,
        max_variant_price: product
            .price_range
            .max_variant_price
            .as_ref()
            .map(convert_money)
            .transpose()?,
    };

    Ok(Product {
        id: product.id,
        handle: product.handle,
        title: product.title,
        price_range,
        featured_image: product.featured_image.map(convert_image),
        images: product
            .images
            .map(|images| images.nodes.into_iter().map(convert_image).collect())
            .unwrap_or_default(),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(|variant| ProductVariant {
                id: variant.id,
                selected_options: variant
                    .selected_options
                    .into_iter()
                    .map(|o| SelectedOption {
                        name: o.name,
                        value: o.value,
                    })
                    .collect(),
            })
            .collect(),
        metafield: product.metafield.map(|m| m.value),
    })
}

/// Convert a listing page; `pageInfo` is passed through unchanged.
///
/// # Errors
///
/// Returns an error if any product fails to convert.
pub fn convert_product_connection(
    products: all_products::Products,
) -> Result<ProductConnection, ShopifyError> {
    Ok(ProductConnection {
        products: products
            .nodes
            .into_iter()
            .map(convert_product)
            .collect::<Result<_, _>>()?,
        page_info: products.page_info,
    })
}
