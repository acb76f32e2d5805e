//! # Checkout
//!
//! The sales desk session: cart, discount, customer and payment method,
//! turned into a [`SaleDraft`] when the operator confirms.
//!
//! ```text
//!  cart ─┐
//!  discount ─┼──► draft() ──► SaleDraft ──► (register stamps id/date/user)
//!  customer ─┤       │
//!  payment ──┘       └─ rejected: empty cart, no payment method,
//!                       discount < 0 or > subtotal (session unchanged)
//! ```
//!
//! The register passes every draft it receives through [`reconcile`]
//! before touching stock. After it has stored the sale,
//! [`Checkout::reset`] clears the cart and every selection.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartTotals};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartItem, Customer, CustomerSnapshot, PaymentMethod, SaleDraft};
use crate::validation::{
    validate_amount, validate_cart_quantity, validate_discount, validate_selling_price,
};
use crate::WALK_IN_CUSTOMER_NAME;

/// Who the sale is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CustomerSelection {
    /// No registered customer; `name` is whatever the operator typed.
    WalkIn { name: String },
    /// An existing customer record.
    Registered { customer: Customer },
}

impl Default for CustomerSelection {
    fn default() -> Self {
        CustomerSelection::WalkIn {
            name: String::new(),
        }
    }
}

impl CustomerSelection {
    /// The snapshot embedded in the sale.
    ///
    /// A walk-in with no typed name becomes [`WALK_IN_CUSTOMER_NAME`].
    pub fn snapshot(&self) -> CustomerSnapshot {
        match self {
            CustomerSelection::Registered { customer } => CustomerSnapshot::from(customer),
            CustomerSelection::WalkIn { name } if name.trim().is_empty() => {
                CustomerSnapshot::walk_in(WALK_IN_CUSTOMER_NAME)
            }
            CustomerSelection::WalkIn { name } => CustomerSnapshot::walk_in(name.trim()),
        }
    }
}

/// One in-progress sale at the desk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    cart: Cart,
    discount: Money,
    customer: CustomerSelection,
    payment_method: Option<PaymentMethod>,
}

impl Checkout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    /// Sets the discount. It is checked against the subtotal at draft time,
    /// since the cart may still change.
    pub fn set_discount(&mut self, discount: Money) -> CoreResult<()> {
        if discount.is_negative() {
            return Err(ValidationError::must_not_be_negative("discount").into());
        }
        self.discount = discount;
        Ok(())
    }

    pub fn customer(&self) -> &CustomerSelection {
        &self.customer
    }

    /// Embeds an existing customer.
    pub fn select_customer(&mut self, customer: &Customer) {
        self.customer = CustomerSelection::Registered {
            customer: customer.clone(),
        };
    }

    /// Types a free-text buyer name, dropping any selected customer.
    pub fn set_walk_in_name(&mut self, name: &str) {
        self.customer = CustomerSelection::WalkIn {
            name: name.to_string(),
        };
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::new(&self.cart, self.discount)
    }

    /// Builds the sale to record, leaving the session untouched.
    pub fn draft(&self) -> CoreResult<SaleDraft> {
        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let payment_method = self
            .payment_method
            .ok_or(CoreError::PaymentMethodRequired)?;

        let subtotal = self.cart.subtotal();
        validate_discount(self.discount, subtotal)?;

        Ok(SaleDraft {
            items: self.cart.items().to_vec(),
            subtotal,
            discount: self.discount,
            total: subtotal - self.discount,
            customer: self.customer.snapshot(),
            payment_method,
        })
    }

    /// Clears the cart, discount, customer and payment selection.
    pub fn reset(&mut self) {
        *self = Checkout::default();
    }
}

/// Re-derives a draft's subtotal and total from its lines.
///
/// ## Rules
/// - At least one line
/// - Every line: 1 ≤ quantity ≤ 999, 0 ≤ sellingPrice ≤ the amount ceiling
/// - 0 ≤ discount ≤ recomputed subtotal
///
/// The stored `subtotal` and `total` are replaced, never trusted.
pub fn reconcile(mut draft: SaleDraft) -> CoreResult<SaleDraft> {
    if draft.items.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    for item in &draft.items {
        validate_cart_quantity(item.quantity)?;
        validate_selling_price(item.selling_price)?;
    }

    let subtotal: Money = draft.items.iter().map(CartItem::line_total).sum();
    validate_amount("subtotal", subtotal)?;
    validate_discount(draft.discount, subtotal)?;

    draft.subtotal = subtotal;
    draft.total = subtotal - draft.discount;
    Ok(draft)
}

// =============================================================================
// Unit Tests
// =============================================================================
