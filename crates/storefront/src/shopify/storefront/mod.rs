//! Shopify Storefront API client implementation.
//!
//! Uses hand-written operations bound to `graphql_client::GraphQLQuery` with
//! `reqwest` 0.13 for HTTP. Every call goes to Shopify; nothing is cached.

mod conversions;
pub mod queries;

use std::sync::Arc;

use coffee_cup_hut_core::Locale;
use coffee_cup_hut_core::cart::CartLineInput;
use coffee_cup_hut_core::filter::MetafieldFilter;
use coffee_cup_hut_core::pagination::PaginationVariables;
use graphql_client::{GraphQLQuery, Response};
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};
use crate::shopify::types::{CartSummary, Collection, Header, Page, Product, ProductConnection};

use conversions::{
    convert_cart_mutation, convert_cart_summary, convert_collection, convert_header,
    convert_page, convert_product, convert_product_connection,
};
use queries::{
    AllProductsQuery, CartCreateMutation, CartLinesAddMutation, CartQuery,
    FeaturedCollectionQuery, HeaderQuery, PageQuery, RecommendedProductsQuery, all_products, cart,
    cart_create, cart_lines_add, featured_collection, header, page, recommended_products,
};

/// Metafield key requested when no tag filter is configured. The field is
/// skipped via `@include(if: false)` in that case.
const UNUSED_METAFIELD_KEY: &str = "tag";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to the shop header, products, content pages, and
/// cart operations. Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                access_token: config.private_token().to_string(),
            }),
        }
    }

    /// Execute a GraphQL operation and return its data.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);
        let operation = request_body.operation_name;
        debug!(operation, "Sending Storefront API request");

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private tokens use their own header, not X-Shopify-Storefront-Access-Token
            .header("Shopify-Storefront-Private-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read as text first so failures can log the body
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation,
                status = %status,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            )));
        }

        let response: Response<Q::ResponseData> =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::error!(
                    operation,
                    error = %e,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Shopify GraphQL response"
                );
                ShopifyError::Parse(e)
            })?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(operation, errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation,
                body = %truncate(&response_text, 500),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::message("No data in response")
        })
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Shop name, primary domain, and the navigation menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn header(&self, locale: &Locale, menu_handle: &str) -> Result<Header, ShopifyError> {
        let data = self
            .execute::<HeaderQuery>(header::Variables {
                country: locale.country.clone(),
                language: locale.language.clone(),
                header_menu_handle: menu_handle.to_string(),
            })
            .await?;

        if data.menu.is_none() {
            debug!(menu_handle, "Menu not found");
        }

        Ok(convert_header(data))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// The collection featured on the home page, if the shop has any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn featured_collection(
        &self,
        locale: &Locale,
    ) -> Result<Option<Collection>, ShopifyError> {
        let data = self
            .execute::<FeaturedCollectionQuery>(featured_collection::Variables {
                country: locale.country.clone(),
                language: locale.language.clone(),
            })
            .await?;

        Ok(data
            .collections
            .nodes
            .into_iter()
            .next()
            .map(convert_collection))
    }

    /// The most recently updated products, with the filter's metafield value
    /// populated when a filter is given.
    ///
    /// Filtering itself happens after the response is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or a product is malformed.
    #[instrument(skip(self, filter), fields(locale = %locale))]
    pub async fn recommended_products(
        &self,
        locale: &Locale,
        filter: Option<&MetafieldFilter>,
    ) -> Result<Vec<Product>, ShopifyError> {
        let variables = recommended_products::Variables {
            country: locale.country.clone(),
            language: locale.language.clone(),
            metafield_namespace: filter.map(|f| f.namespace.clone()),
            metafield_key: filter.map_or_else(|| UNUSED_METAFIELD_KEY.to_string(), |f| f.key.clone()),
            with_metafield: filter.is_some(),
        };

        let data = self.execute::<RecommendedProductsQuery>(variables).await?;

        data.products
            .nodes
            .into_iter()
            .map(convert_product)
            .collect()
    }

    /// One page of the full product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or a product is malformed.
    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn all_products(
        &self,
        locale: &Locale,
        pagination: PaginationVariables,
    ) -> Result<ProductConnection, ShopifyError> {
        let data = self
            .execute::<AllProductsQuery>(all_products::Variables {
                country: locale.country.clone(),
                language: locale.language.clone(),
                pagination,
            })
            .await?;

        convert_product_connection(data.products)
    }

    // =========================================================================
    // Page Methods
    // =========================================================================

    /// A content page by handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no page has this handle, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale, handle = %handle))]
    pub async fn page(&self, locale: &Locale, handle: &str) -> Result<Page, ShopifyError> {
        let data = self
            .execute::<PageQuery>(page::Variables {
                country: locale.country.clone(),
                language: locale.language.clone(),
                handle: handle.to_string(),
            })
            .await?;

        data.page
            .map(convert_page)
            .ok_or_else(|| ShopifyError::NotFound(format!("Page not found: {handle}")))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Summary of an existing cart; `None` if it expired or was checked out.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(locale = %locale, cart_id = %cart_id))]
    pub async fn cart(
        &self,
        locale: &Locale,
        cart_id: &str,
    ) -> Result<Option<CartSummary>, ShopifyError> {
        let data = self
            .execute::<CartQuery>(cart::Variables {
                cart_id: cart_id.to_string(),
                country: locale.country.clone(),
                language: locale.language.clone(),
            })
            .await?;

        Ok(data.cart.map(convert_cart_summary))
    }

    /// Create a cart holding `lines`.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the lines, or an
    /// error if the API request fails.
    #[instrument(skip(self, lines), fields(locale = %locale, lines = lines.len()))]
    pub async fn create_cart(
        &self,
        locale: &Locale,
        lines: Vec<CartLineInput>,
    ) -> Result<CartSummary, ShopifyError> {
        let data = self
            .execute::<CartCreateMutation>(cart_create::Variables {
                input: cart_create::CartInput { lines },
                country: locale.country.clone(),
                language: locale.language.clone(),
            })
            .await?;

        convert_cart_mutation(data.cart_create, "cartCreate")
    }

    /// Add `lines` to an existing cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::UserError` if Shopify rejects the lines, or an
    /// error if the API request fails.
    #[instrument(skip(self, lines), fields(locale = %locale, cart_id = %cart_id, lines = lines.len()))]
    pub async fn add_cart_lines(
        &self,
        locale: &Locale,
        cart_id: &str,
        lines: Vec<CartLineInput>,
    ) -> Result<CartSummary, ShopifyError> {
        let data = self
            .execute::<CartLinesAddMutation>(cart_lines_add::Variables {
                cart_id: cart_id.to_string(),
                lines,
                country: locale.country.clone(),
                language: locale.language.clone(),
            })
            .await?;

        convert_cart_mutation(data.cart_lines_add, "cartLinesAdd")
    }
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error
            .locations
            .unwrap_or_default()
            .into_iter()
            .map(|l| GraphQLErrorLocation {
                line: i64::from(l.line),
                column: i64::from(l.column),
            })
            .collect(),
        path: error
            .path
            .unwrap_or_default()
            .into_iter()
            .map(|fragment| match fragment {
                graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
            })
            .collect(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
