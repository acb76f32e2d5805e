//! # Sales Desk State
//!
//! The in-progress sale at the counter: cart, discount, customer and
//! payment method.
//!
//! ## Thread Safety
//! The desk is wrapped in `Arc<Mutex<T>>` because every desk command
//! changes it and only one may do so at a time.
//!
//! ## Desk Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sales Desk Operations                                │
//! │                                                                         │
//! │  Operator Action          Command                 Desk Change           │
//! │  ───────────────          ───────                 ───────────           │
//! │                                                                         │
//! │  Pick product ───────────► add_to_cart() ───────► cart.add()            │
//! │  Change quantity ────────► set_cart_quantity() ─► cart.set_quantity()   │
//! │  Enter discount ─────────► set_discount() ──────► discount = n          │
//! │  Pick customer ──────────► select_customer() ───► Registered            │
//! │  Type a name ────────────► set_walk_in_name() ──► WalkIn                │
//! │  Choose cash / bank ─────► set_payment_method() ► payment = m           │
//! │                                                                         │
//! │  Checkout ───────────────► checkout() ──────────► record, then reset    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use pincorp_core::checkout::Checkout;

use crate::error::ApiError;

/// Thread-safe wrapper around the sales desk.
#[derive(Debug, Clone, Default)]
pub struct SalesDeskState {
    desk: Arc<Mutex<Checkout>>,
}

impl SalesDeskState {
    /// Creates a desk with an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the desk.
    pub fn with_desk<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&Checkout) -> R,
    {
        let desk = self
            .desk
            .lock()
            .map_err(|_| ApiError::internal("Sales desk lock poisoned"))?;
        Ok(f(&desk))
    }

    /// Executes a function with write access to the desk.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// desk_state.with_desk_mut(|desk| desk.cart_mut().add(&product, 1))??;
    /// ```
    pub fn with_desk_mut<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut Checkout) -> R,
    {
        let mut desk = self
            .desk
            .lock()
            .map_err(|_| ApiError::internal("Sales desk lock poisoned"))?;
        Ok(f(&mut desk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pincorp_core::{Money, PaymentMethod};

    #[test]
    fn test_clones_share_the_desk() {
        let state = SalesDeskState::new();
        let other = state.clone();

        state
            .with_desk_mut(|desk| desk.set_payment_method(PaymentMethod::Bank))
            .unwrap();
        assert_eq!(
            other.with_desk(|desk| desk.payment_method()).unwrap(),
            Some(PaymentMethod::Bank)
        );
        assert_eq!(other.with_desk(|desk| desk.discount()).unwrap(), Money::zero());
    }
}
