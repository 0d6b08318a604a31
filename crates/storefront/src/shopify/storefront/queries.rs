//! GraphQL query definitions for Shopify Storefront API.
//!
//! Every operation runs `@inContext(country, language)` so prices and content
//! come back localized for the request's locale. Each operation has a module
//! holding its `Variables` and raw `ResponseData`, mirroring the layout
//! `graphql_client` codegen produces.

use graphql_client::{GraphQLQuery, QueryBody};

/// Bind a document and its module's types to a `GraphQLQuery` marker struct.
macro_rules! operation {
    ($(#[$meta:meta])* $name:ident, $module:ident, $document:expr, $operation:literal) => {
        $(#[$meta])*
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: $operation,
                }
            }
        }
    };
}

// =============================================================================
// Shared response shapes
// =============================================================================

pub mod common {
    use serde::Deserialize;

    /// `{ nodes: [...] }` connection shape.
    #[derive(Debug, Clone, Deserialize)]
    pub struct Nodes<T> {
        pub nodes: Vec<T>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyV2 {
        pub amount: String,
        pub currency_code: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Image {
        pub id: Option<String>,
        pub url: String,
        pub alt_text: Option<String>,
        pub width: Option<i64>,
        pub height: Option<i64>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct SelectedOption {
        pub name: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variant {
        pub id: String,
        #[serde(default)]
        pub selected_options: Vec<SelectedOption>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PriceRange {
        pub min_variant_price: MoneyV2,
        pub max_variant_price: Option<MoneyV2>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Metafield {
        pub value: String,
    }

    /// Product fields shared by the listing and the home page picks.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Product {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub featured_image: Option<Image>,
        #[serde(default)]
        pub images: Option<Nodes<Image>>,
        pub price_range: PriceRange,
        pub variants: Nodes<Variant>,
        #[serde(default)]
        pub metafield: Option<Metafield>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartSummary {
        pub id: String,
        pub total_quantity: i64,
        pub checkout_url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CartUserError {
        pub field: Option<Vec<String>>,
        pub message: String,
    }

    /// Payload of `cartCreate` and `cartLinesAdd`.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartMutationPayload {
        pub cart: Option<CartSummary>,
        #[serde(default)]
        pub user_errors: Vec<CartUserError>,
    }
}

// =============================================================================
// Header (layout)
// =============================================================================

const HEADER_QUERY: &str = r"
fragment MenuItem on MenuItem {
  id
  title
  url
}
query Header(
  $country: CountryCode
  $language: LanguageCode
  $headerMenuHandle: String!
) @inContext(country: $country, language: $language) {
  shop {
    name
    primaryDomain {
      url
    }
  }
  menu(handle: $headerMenuHandle) {
    items {
      ...MenuItem
      items {
        ...MenuItem
        items {
          ...MenuItem
        }
      }
    }
  }
}
";

pub mod header {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub country: String,
        pub language: String,
        pub header_menu_handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: Shop,
        pub menu: Option<Menu>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Shop {
        pub name: String,
        pub primary_domain: Domain,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Domain {
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Menu {
        pub items: Vec<MenuItem>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct MenuItem {
        pub id: String,
        pub title: String,
        pub url: Option<String>,
        #[serde(default)]
        pub items: Vec<MenuItem>,
    }
}

operation!(
    /// Shop name, primary domain and the header menu.
    HeaderQuery,
    header,
    HEADER_QUERY,
    "Header"
);

// =============================================================================
// Home page
// =============================================================================

const FEATURED_COLLECTION_QUERY: &str = r"
query FeaturedCollection($country: CountryCode, $language: LanguageCode)
  @inContext(country: $country, language: $language) {
  collections(first: 1, sortKey: UPDATED_AT, reverse: true) {
    nodes {
      id
      title
      handle
      image {
        id
        url
        altText
        width
        height
      }
    }
  }
}
";

pub mod featured_collection {
    use serde::{Deserialize, Serialize};

    use super::common::{Image, Nodes};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub country: String,
        pub language: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Nodes<Collection>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Collection {
        pub id: String,
        pub title: String,
        pub handle: String,
        pub image: Option<Image>,
    }
}

operation!(
    /// The most recently updated collection.
    FeaturedCollectionQuery,
    featured_collection,
    FEATURED_COLLECTION_QUERY,
    "FeaturedCollection"
);

const RECOMMENDED_PRODUCTS_QUERY: &str = r"
query RecommendedProducts(
  $country: CountryCode
  $language: LanguageCode
  $metafieldNamespace: String
  $metafieldKey: String!
  $withMetafield: Boolean!
) @inContext(country: $country, language: $language) {
  products(first: 4, sortKey: UPDATED_AT, reverse: true) {
    nodes {
      id
      title
      handle
      featuredImage {
        id
        url
        altText
        width
        height
      }
      images(first: 1) {
        nodes {
          id
          url
          altText
          width
          height
        }
      }
      priceRange {
        minVariantPrice {
          amount
          currencyCode
        }
      }
      variants(first: 1) {
        nodes {
          id
          selectedOptions {
            name
            value
          }
        }
      }
      metafield(namespace: $metafieldNamespace, key: $metafieldKey) @include(if: $withMetafield) {
        value
      }
    }
  }
}
";

pub mod recommended_products {
    use serde::{Deserialize, Serialize};

    use super::common::{Nodes, Product};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub country: String,
        pub language: String,
        pub metafield_namespace: Option<String>,
        pub metafield_key: String,
        pub with_metafield: bool,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<Product>,
    }
}

operation!(
    /// The four most recently updated products.
    RecommendedProductsQuery,
    recommended_products,
    RECOMMENDED_PRODUCTS_QUERY,
    "RecommendedProducts"
);

// =============================================================================
// All products listing
// =============================================================================

const ALL_PRODUCTS_QUERY: &str = r"
fragment MoneyProductItem on MoneyV2 {
  amount
  currencyCode
}
fragment ProductItem on Product {
  id
  handle
  title
  featuredImage {
    id
    altText
    url
    width
    height
  }
  priceRange {
    minVariantPrice {
      ...MoneyProductItem
    }
    maxVariantPrice {
      ...MoneyProductItem
    }
  }
  variants(first: 1) {
    nodes {
      id
      selectedOptions {
        name
        value
      }
    }
  }
}
query AllProducts(
  $country: CountryCode
  $language: LanguageCode
  $first: Int
  $last: Int
  $before: String
  $after: String
) @inContext(country: $country, language: $language) {
  products(first: $first, last: $last, before: $before, after: $after) {
    nodes {
      ...ProductItem
    }
    pageInfo {
      hasPreviousPage
      hasNextPage
      startCursor
      endCursor
    }
  }
}
";

pub mod all_products {
    use coffee_cup_hut_core::pagination::{PageInfo, PaginationVariables};
    use serde::{Deserialize, Serialize};

    use super::common::Product;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub country: String,
        pub language: String,
        #[serde(flatten)]
        pub pagination: PaginationVariables,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Products,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Products {
        pub nodes: Vec<Product>,
        pub page_info: PageInfo,
    }
}

operation!(
    /// One page of the full product catalog.
    AllProductsQuery,
    all_products,
    ALL_PRODUCTS_QUERY,
    "AllProducts"
);

// =============================================================================
// Content pages
// =============================================================================

const PAGE_QUERY: &str = r"
query Page($language: LanguageCode, $country: CountryCode, $handle: String!)
  @inContext(language: $language, country: $country) {
  page(handle: $handle) {
    id
    handle
    title
    body
    seo {
      description
      title
    }
  }
}
";

pub mod page {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub country: String,
        pub language: String,
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub page: Option<Page>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Page {
        pub id: String,
        pub handle: String,
        pub title: String,
        pub body: String,
        pub seo: Option<Seo>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct Seo {
        pub title: Option<String>,
        pub description: Option<String>,
    }
}

operation!(
    /// A content page by handle.
    PageQuery,
    page,
    PAGE_QUERY,
    "Page"
);

// =============================================================================
// Cart
// =============================================================================

const CART_QUERY: &str = r"
query CartSummary($cartId: ID!, $country: CountryCode, $language: LanguageCode)
  @inContext(country: $country, language: $language) {
  cart(id: $cartId) {
    id
    totalQuantity
    checkoutUrl
  }
}
";

pub mod cart {
    use serde::{Deserialize, Serialize};

    use super::common::CartSummary;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub country: String,
        pub language: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartSummary>,
    }
}

operation!(
    /// The visitor's cart summary.
    CartQuery,
    cart,
    CART_QUERY,
    "CartSummary"
);

const CART_CREATE_MUTATION: &str = r"
mutation cartCreate($input: CartInput!, $country: CountryCode, $language: LanguageCode)
  @inContext(country: $country, language: $language) {
  cartCreate(input: $input) {
    cart {
      id
      totalQuantity
      checkoutUrl
    }
    userErrors {
      field
      message
    }
  }
}
";

pub mod cart_create {
    use coffee_cup_hut_core::cart::CartLineInput;
    use serde::{Deserialize, Serialize};

    use super::common::CartMutationPayload;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
        pub country: String,
        pub language: String,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct CartInput {
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartMutationPayload>,
    }
}

operation!(
    /// Create a cart holding the first lines.
    CartCreateMutation,
    cart_create,
    CART_CREATE_MUTATION,
    "cartCreate"
);

const CART_LINES_ADD_MUTATION: &str = r"
mutation cartLinesAdd(
  $cartId: ID!
  $lines: [CartLineInput!]!
  $country: CountryCode
  $language: LanguageCode
) @inContext(country: $country, language: $language) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart {
      id
      totalQuantity
      checkoutUrl
    }
    userErrors {
      field
      message
    }
  }
}
";

pub mod cart_lines_add {
    use coffee_cup_hut_core::cart::CartLineInput;
    use serde::{Deserialize, Serialize};

    use super::common::CartMutationPayload;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: String,
        pub lines: Vec<CartLineInput>,
        pub country: String,
        pub language: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

operation!(
    /// Add lines to an existing cart.
    CartLinesAddMutation,
    cart_lines_add,
    CART_LINES_ADD_MUTATION,
    "cartLinesAdd"
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use coffee_cup_hut_core::pagination::{Direction, PaginationQuery};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_all_products_variables_flatten_pagination() {
        let body = AllProductsQuery::build_query(all_products::Variables {
            country: "US".to_string(),
            language: "EN".to_string(),
            pagination: PaginationQuery::new(Direction::Previous, "c9").variables(8),
        });
        assert_eq!(body.operation_name, "AllProducts");
        assert_eq!(
            serde_json::to_value(&body.variables).unwrap(),
            json!({"country": "US", "language": "EN", "last": 8, "before": "c9"})
        );
    }

    #[test]
    fn test_documents_use_in_context() {
        for document in [
            HEADER_QUERY,
            FEATURED_COLLECTION_QUERY,
            RECOMMENDED_PRODUCTS_QUERY,
            ALL_PRODUCTS_QUERY,
            PAGE_QUERY,
            CART_QUERY,
            CART_CREATE_MUTATION,
            CART_LINES_ADD_MUTATION,
        ] {
            assert!(document.contains("@inContext("), "{document}");
        }
    }

    #[test]
    fn test_menu_items_decode_recursively() {
        let data: header::ResponseData = serde_json::from_value(json!({
            "shop": {"name": "Coffee Cup Hut", "primaryDomain": {"url": "https://coffeecuphut.com"}},
            "menu": {"items": [
                {"id": "shop", "title": "Shop", "url": "https://coffeecuphut.com/collections/all", "items": [
                    {"id": "mugs", "title": "Mugs", "url": null, "items": []}
                ]}
            ]}
        }))
        .unwrap();
        let menu = data.menu.unwrap();
        assert_eq!(menu.items.len(), 1);
        assert_eq!(menu.items[0].items[0].id, "mugs");
    }

    #[test]
    fn test_cart_lines_add_variables_shape() {
        let body = CartLinesAddMutation::build_query(cart_lines_add::Variables {
            cart_id: "gid://shopify/Cart/1".to_string(),
            lines: vec![coffee_cup_hut_core::cart::CartLineInput::single("V123")],
            country: "US".to_string(),
            language: "EN".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&body.variables).unwrap()["lines"],
            json!([{"merchandiseId": "V123", "quantity": 1}])
        );
    }
}
