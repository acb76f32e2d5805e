//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in PinCorp                                │
//! │                                                                         │
//! │  pincorp production create --bom bom-battery --quantity 4               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  Command Function                                                │   │
//! │  │  Result<T, ApiError>                                             │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Store Error? ─── StoreError::NotFound { .. } ─────┐             │   │
//! │  │         │                                          │             │   │
//! │  │         ▼                                          ▼             │   │
//! │  │  Rule Error? ─── CoreError::InsufficientMaterials ─ ApiError ──► │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Success ──────────────────────────────────────────────────────► │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  stderr: {"code":"INSUFFICIENT_STOCK",                                  │
//! │           "message":"Insufficient materials: Casing (need 4, have 3)"}  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error leaves state unchanged, so the operator corrects the input
//! and runs the command again.

use pincorp_core::CoreError;
use pincorp_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// API error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Material not found: m-42"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Entity not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not enough materials or finished goods
    InsufficientStock,

    /// Production order status change not allowed
    InvalidTransition,

    /// Destructive action needs explicit confirmation
    ConfirmationRequired,

    /// Checkout without cart lines or payment method
    CheckoutIncomplete,

    /// Snapshot could not be read or written
    StorageError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Core(e) => ApiError::from(e),
            StoreError::SnapshotIo { path, source } => {
                // Log the actual error but return a shorter message
                tracing::error!(path = %path.display(), error = %source, "Snapshot I/O failed");
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Could not access data file {}", path.display()),
                )
            }
            StoreError::SnapshotFormat(e) => {
                tracing::error!("Snapshot format error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Data file is corrupt")
            }
            e @ StoreError::UnsupportedSnapshot { .. } => {
                ApiError::new(ErrorCode::StorageError, e.to_string())
            }
            StoreError::LockPoisoned => ApiError::internal("Store lock poisoned"),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::NotInCart(_) => ErrorCode::NotFound,
            CoreError::InsufficientMaterials { .. } | CoreError::InsufficientStock { .. } => {
                ErrorCode::InsufficientStock
            }
            CoreError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            CoreError::ConfirmationRequired { .. } => ErrorCode::ConfirmationRequired,
            CoreError::EmptyCart | CoreError::PaymentMethodRequired => {
                ErrorCode::CheckoutIncomplete
            }
            CoreError::CartTooLarge { .. } => ErrorCode::ValidationError,
            CoreError::Validation(e) => return ApiError::validation(e.to_string()),
        };
        ApiError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pincorp_core::{OrderStatus, ValidationError};

    #[test]
    fn test_codes() {
        let err = ApiError::from(StoreError::not_found("Material", "m-42"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Material not found: m-42");

        let err = ApiError::from(CoreError::PaymentMethodRequired);
        assert_eq!(err.code, ErrorCode::CheckoutIncomplete);

        let err = ApiError::from(StoreError::confirmation_required("delete BOM"));
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);

        let err = ApiError::from(CoreError::InvalidTransition {
            order_id: "o1".to_string(),
            from: OrderStatus::Completed,
            to: OrderStatus::Pending,
        });
        assert_eq!(err.code, ErrorCode::InvalidTransition);

        let err = ApiError::from(StoreError::from(ValidationError::required("name")));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::new(ErrorCode::InsufficientStock, "Casing (need 4, have 3)");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
        assert_eq!(json["message"], "Casing (need 4, have 3)");
    }
}
