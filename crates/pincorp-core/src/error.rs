//! # Error Types
//!
//! Domain-specific error types for pincorp-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pincorp-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pincorp-store errors (separate crate)                                 │
//! │  └── StoreError       - State owner / snapshot failures                │
//! │                                                                         │
//! │  console errors (in app)                                               │
//! │  └── ApiError         - What the operator sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Operator  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant here is recoverable: the operation that produced it left
//! all state untouched and the operator can correct the input and retry.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not a line of the cart.
    #[error("Product not in cart: {0}")]
    NotInCart(String),

    /// One or more BOM lines need more material than is in stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Create order: Battery-12V × 4
    ///      │
    ///      ▼
    /// Casing: need 4, stock 3
    ///      │
    ///      ▼
    /// InsufficientMaterials { shortages: [Casing 4/3] }
    ///      │
    ///      ▼
    /// Editor highlights the Casing line, order is not saved
    /// ```
    #[error("Insufficient materials: {}", describe_shortages(.shortages))]
    InsufficientMaterials { shortages: Vec<Shortage> },

    /// Not enough finished goods to complete a sale.
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// The requested production order status change is not allowed.
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// A destructive action was requested without explicit confirmation.
    #[error("Confirmation required to {action}")]
    ConfirmationRequired { action: String },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout attempted without choosing cash or bank transfer.
    #[error("Payment method is required")]
    PaymentMethodRequired,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// A BOM line whose requirement exceeds the material on hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortage {
    pub material_id: String,
    pub name: String,
    pub required: Decimal,
    pub available: Decimal,
}

fn describe_shortages(shortages: &[Shortage]) -> String {
    shortages
        .iter()
        .map(|s| format!("{} (need {}, have {})", s.name, s.required, s.available))
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by editors before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is above an upper bound.
    #[error("{field} must not exceed {limit}")]
    ExceedsLimit { field: String, limit: String },

    /// Duplicate value (e.g. the same material twice on one BOM).
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }

    pub fn must_not_be_negative(field: &str) -> Self {
        ValidationError::MustNotBeNegative {
            field: field.to_string(),
        }
    }

    pub fn exceeds_limit(field: &str, limit: impl std::fmt::Display) -> Self {
        ValidationError::ExceedsLimit {
            field: field.to_string(),
            limit: limit.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "PIN-12V".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for PIN-12V: available 3, requested 5"
        );
    }

    #[test]
    fn test_shortage_message_lists_every_line() {
        let err = CoreError::InsufficientMaterials {
            shortages: vec![
                Shortage {
                    material_id: "m1".to_string(),
                    name: "Casing".to_string(),
                    required: Decimal::from(4),
                    available: Decimal::from(3),
                },
                Shortage {
                    material_id: "m2".to_string(),
                    name: "Nickel strip".to_string(),
                    required: Decimal::new(25, 1),
                    available: Decimal::ZERO,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Insufficient materials: Casing (need 4, have 3), Nickel strip (need 2.5, have 0)"
        );
    }

    #[test]
    fn test_transition_message() {
        let err = CoreError::InvalidTransition {
            order_id: "PO-1".to_string(),
            from: OrderStatus::Completed,
            to: OrderStatus::Cancelled,
        };
        assert_eq!(err.to_string(), "Order PO-1 cannot move from completed to cancelled");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("productName").to_string(),
            "productName is required"
        );
        assert_eq!(
            ValidationError::must_be_positive("purchasePrice").to_string(),
            "purchasePrice must be positive"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
