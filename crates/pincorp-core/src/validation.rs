//! # Validation Module
//!
//! Editor validation rules for the workshop catalogs and ledgers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console (clap)                                                │
//! │  └── Type validation (argument parsing)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Required fields (names, phone, description)                        │
//! │  └── Numeric rules (price > 0, quantity > 0, discount ≤ subtotal)       │
//! │      with upper bounds, so no later sum can overflow                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: pincorp-store                                                 │
//! │  └── Referential and stock rules inside one transaction                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator runs before any state is touched, so a rejected save
//! leaves the catalogs exactly as they were.
//!
//! ## Usage
//! ```rust
//! use pincorp_core::validation::{validate_name, validate_production_quantity};
//!
//! validate_name("productName", "Battery-12V").unwrap();
//! assert!(validate_production_quantity(0).is_err());
//! ```

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AdditionalCost, Bom, Customer, Material};
use crate::{MAX_AMOUNT, MAX_ITEM_QUANTITY, MAX_PRODUCTION_QUANTITY, MAX_SEARCH_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest name accepted by any editor.
const MAX_NAME_LENGTH: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (material, product, customer).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (list operations then return everything)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LENGTH {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LENGTH,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an amount against [`MAX_AMOUNT`].
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.minor() > MAX_AMOUNT {
        return Err(ValidationError::exceeds_limit(
            field,
            Money::from_minor(MAX_AMOUNT),
        ));
    }
    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a material before it is saved.
///
/// ## Rules
/// - `name` non-empty
/// - 0 < `purchasePrice` ≤ [`MAX_AMOUNT`]
/// - `stock` ≥ 0
pub fn validate_material(material: &Material) -> ValidationResult<()> {
    validate_name("name", &material.name)?;

    if !material.purchase_price.is_positive() {
        return Err(ValidationError::must_be_positive("purchasePrice"));
    }
    validate_amount("purchasePrice", material.purchase_price)?;

    if material.stock < Decimal::ZERO {
        return Err(ValidationError::must_not_be_negative("stock"));
    }

    Ok(())
}

/// Validates a BOM before it is saved.
///
/// ## Rules
/// - `productName` non-empty
/// - At least one material line
/// - Every line quantity > 0
/// - No material appears twice
///
/// `productSku` is deliberately not required to be unique across BOMs.
pub fn validate_bom(bom: &Bom) -> ValidationResult<()> {
    validate_name("productName", &bom.product_name)?;

    if bom.materials.is_empty() {
        return Err(ValidationError::required("materials"));
    }

    let mut seen = HashSet::with_capacity(bom.materials.len());
    for line in &bom.materials {
        if line.material_id.trim().is_empty() {
            return Err(ValidationError::required("materialId"));
        }
        if line.quantity <= Decimal::ZERO {
            return Err(ValidationError::must_be_positive("quantity"));
        }
        if !seen.insert(line.material_id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "materialId".to_string(),
                value: line.material_id.clone(),
            });
        }
    }

    Ok(())
}

/// Validates a customer registration.
///
/// Both name and phone are required.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_name("name", &customer.name)?;

    if customer.phone.trim().is_empty() {
        return Err(ValidationError::required("phone"));
    }

    Ok(())
}

/// Validates a selling price edit. Zero is allowed (not yet priced).
pub fn validate_selling_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::must_not_be_negative("sellingPrice"));
    }
    validate_amount("sellingPrice", price)
}

// =============================================================================
// Production Validators
// =============================================================================

/// Validates an additional cost entry.
///
/// ## Rules
/// - `description` non-empty
/// - 0 < `amount` ≤ [`MAX_AMOUNT`]
pub fn validate_additional_cost(cost: &AdditionalCost) -> ValidationResult<()> {
    if cost.description.trim().is_empty() {
        return Err(ValidationError::required("description"));
    }

    if !cost.amount.is_positive() {
        return Err(ValidationError::must_be_positive("amount"));
    }

    validate_amount("amount", cost.amount)
}

/// Validates the requested output of a production order.
///
/// ## Rules
/// - 1 ≤ quantity ≤ [`MAX_PRODUCTION_QUANTITY`]
pub fn validate_production_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::must_be_positive("quantityProduced"));
    }
    if quantity > MAX_PRODUCTION_QUANTITY {
        return Err(ValidationError::exceeds_limit(
            "quantityProduced",
            MAX_PRODUCTION_QUANTITY,
        ));
    }
    Ok(())
}

/// Validates the quantity of a cost preview, which may be fractional.
pub fn validate_estimate_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    if quantity > Decimal::from(MAX_PRODUCTION_QUANTITY) {
        return Err(ValidationError::exceeds_limit(
            "quantity",
            MAX_PRODUCTION_QUANTITY,
        ));
    }
    Ok(())
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates a sale discount against the cart subtotal.
///
/// ## Rules
/// - Must be ≥ 0
/// - Must not exceed the subtotal (a sale total is never negative)
pub fn validate_discount(discount: Money, subtotal: Money) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::must_not_be_negative("discount"));
    }

    if discount > subtotal {
        return Err(ValidationError::ExceedsLimit {
            field: "discount".to_string(),
            limit: subtotal.to_string(),
        });
    }

    Ok(())
}

/// Validates a cart quantity entered by the operator.
///
/// ## Rules
/// - 1 ≤ quantity ≤ [`MAX_ITEM_QUANTITY`]
pub fn validate_cart_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::exceeds_limit("quantity", MAX_ITEM_QUANTITY));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
