//! Cart mutation payloads.
//!
//! The storefront never holds cart contents. It builds a line-item payload,
//! hands it to the backend and renders whatever summary comes back.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors validating a cart form submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartInputError {
    #[error("unknown cart action: {0}")]
    UnknownAction(String),
    #[error("malformed cart lines: {0}")]
    Malformed(String),
    #[error("no cart lines submitted")]
    EmptyLines,
    #[error("cart line is missing a merchandise id")]
    MissingMerchandise,
    #[error("invalid quantity {0} (must be at least 1)")]
    InvalidQuantity(i64),
}

/// One line to add: a product variant and a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    pub quantity: i64,
}

impl CartLineInput {
    /// Quantity used by the add-to-cart button.
    pub const DEFAULT_QUANTITY: i64 = 1;

    /// A single unit of a variant.
    #[must_use]
    pub fn single(merchandise_id: impl Into<String>) -> Self {
        Self {
            merchandise_id: merchandise_id.into(),
            quantity: Self::DEFAULT_QUANTITY,
        }
    }
}

/// Cart action discriminator submitted with the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartAction {
    LinesAdd,
}

impl CartAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinesAdd => "LinesAdd",
        }
    }
}

impl FromStr for CartAction {
    type Err = CartInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LinesAdd" => Ok(Self::LinesAdd),
            other => Err(CartInputError::UnknownAction(other.to_string())),
        }
    }
}

/// Payload of the "add lines" mutation: `{"lines": [{"merchandiseId", "quantity"}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLinesAdd {
    pub lines: Vec<CartLineInput>,
}

impl CartLinesAdd {
    /// One unit of one variant, as the product card button submits.
    #[must_use]
    pub fn single_variant(merchandise_id: impl Into<String>) -> Self {
        Self {
            lines: vec![CartLineInput::single(merchandise_id)],
        }
    }

    /// Decode the `lines` form field (a JSON array of line inputs).
    ///
    /// # Errors
    ///
    /// Returns `CartInputError::Malformed` for invalid JSON, or any
    /// validation error from [`CartLinesAdd::validate`].
    pub fn from_form_field(lines: &str) -> Result<Self, CartInputError> {
        let lines: Vec<CartLineInput> =
            serde_json::from_str(lines).map_err(|e| CartInputError::Malformed(e.to_string()))?;
        let payload = Self { lines };
        payload.validate()?;
        Ok(payload)
    }

    /// Encode the `lines` form field.
    #[must_use]
    pub fn to_form_field(&self) -> String {
        serde_json::to_string(&self.lines).unwrap_or_else(|_| "[]".to_string())
    }

    /// Check the payload before it is sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty line list, a blank merchandise id, or a
    /// quantity below 1.
    pub fn validate(&self) -> Result<(), CartInputError> {
        if self.lines.is_empty() {
            return Err(CartInputError::EmptyLines);
        }
        for line in &self.lines {
            if line.merchandise_id.trim().is_empty() {
                return Err(CartInputError::MissingMerchandise);
            }
            if line.quantity < 1 {
                return Err(CartInputError::InvalidQuantity(line.quantity));
            }
        }
        Ok(())
    }
}
