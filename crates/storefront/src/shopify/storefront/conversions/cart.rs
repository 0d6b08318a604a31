//! Cart type conversion functions.

use crate::shopify::ShopifyError;
use crate::shopify::types::CartSummary;

use super::super::queries::common;

pub fn convert_cart_summary(cart: common::CartSummary) -> CartSummary {
    CartSummary {
        id: cart.id,
        total_quantity: cart.total_quantity,
        checkout_url: cart.checkout_url,
    }
}

/// Turn a `cartCreate`/`cartLinesAdd` payload into the updated summary.
///
/// User errors (sold out, invalid variant, ...) take precedence over any cart
/// returned alongside them.
pub fn convert_cart_mutation(
    payload: Option<common::CartMutationPayload>,
    operation: &str,
) -> Result<CartSummary, ShopifyError> {
    let Some(payload) = payload else {
        return Err(ShopifyError::message(format!("{operation} returned no payload")));
    };

    if !payload.user_errors.is_empty() {
        for error in &payload.user_errors {
            tracing::debug!(
                operation,
                field = ?error.field,
                message = %error.message,
                "Cart mutation user error"
            );
        }
        return Err(ShopifyError::UserError(
            payload
                .user_errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        ));
    }

    payload
        .cart
        .map(convert_cart_summary)
        .ok_or_else(|| ShopifyError::message(format!("{operation} returned no cart")))
}
