//! # Cart
//!
//! The in-progress sale at the counter.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Cart Method             Line Change           │
//! │  ───────────────          ───────────             ───────────           │
//! │                                                                         │
//! │  Pick product ───────────► add() ────────────────► push, or qty += n   │
//! │                                                    (capped at stock     │
//! │                                                     and 999)            │
//! │                                                                         │
//! │  Change quantity ────────► set_quantity() ───────► qty = clamp(n)      │
//! │                                                    (0 removes the line) │
//! │                                                                         │
//! │  Remove ─────────────────► remove() ─────────────► retain(!= id)       │
//! │                                                                         │
//! │  Checkout / abandon ─────► clear() ──────────────► items.clear()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id`
//! - Every line has `1 ≤ quantity ≤ min(stock, MAX_ITEM_QUANTITY)`

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartItem, Product};
use crate::validation::validate_cart_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product or increases the quantity of its existing line.
    ///
    /// The resulting quantity is capped at the product's current stock and
    /// at [`MAX_ITEM_QUANTITY`]. Returns the line's quantity after the change.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<i64> {
        validate_cart_quantity(quantity)?;

        if product.stock <= 0 {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock.max(0),
                requested: quantity,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.stock = product.stock;
            item.quantity = item
                .quantity
                .saturating_add(quantity)
                .min(product.stock)
                .min(MAX_ITEM_QUANTITY);
            return Ok(item.quantity);
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        let line = CartItem::from_product(product, quantity.min(product.stock));
        let added = line.quantity;
        self.items.push(line);
        Ok(added)
    }

    /// Sets a line's quantity, clamped to `[0, min(stock, MAX_ITEM_QUANTITY)]`.
    ///
    /// A quantity of zero or below removes the line. Returns the quantity
    /// kept.
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<i64> {
        let Some(pos) = self.items.iter().position(|i| i.product_id == product_id) else {
            return Err(CoreError::NotInCart(product_id.to_string()));
        };

        let ceiling = self.items[pos].stock.clamp(0, MAX_ITEM_QUANTITY);
        let clamped = quantity.clamp(0, ceiling);
        if clamped == 0 {
            self.items.remove(pos);
        } else {
            self.items[pos].quantity = clamped;
        }
        Ok(clamped)
    }

    /// Removes a line. Returns false if the product was not in the cart.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != initial_len
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity over all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ sellingPrice × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cart totals summary for the checkout panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    /// subtotal − discount.
    pub total: Money,
}

impl CartTotals {
    pub fn new(cart: &Cart, discount: Money) -> Self {
        let subtotal = cart.subtotal();
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals::new(cart, Money::zero())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            sku: format!("SKU-{id}"),
            stock,
            cost_price: Money::from_minor(price / 2),
            selling_price: Money::from_minor(price),
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let product = test_product("a", 100_000, 5);

        assert_eq!(cart.add(&product, 2).unwrap(), 2);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().minor(), 200_000);
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let product = test_product("a", 100_000, 10);

        cart.add(&product, 2).unwrap();
        cart.add(&product, 3).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_add_is_capped_at_stock() {
        let mut cart = Cart::new();
        let product = test_product("a", 100_000, 3);

        assert_eq!(cart.add(&product, 2).unwrap(), 2);
        assert_eq!(cart.add(&product, 2).unwrap(), 3);
        assert_eq!(cart.add(&product, 1).unwrap(), 3);
        assert_eq!(cart.add(&test_product("b", 1_000, 1), 5).unwrap(), 1);
    }

    #[test]
    fn test_cart_rejects_out_of_stock_and_bad_quantity() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&test_product("a", 1_000, 0), 1),
            Err(CoreError::InsufficientStock { .. })
        ));
        assert!(cart.add(&test_product("b", 1_000, 5), 0).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_and_removes() {
        let mut cart = Cart::new();
        cart.add(&test_product("a", 100_000, 4), 1).unwrap();

        assert_eq!(cart.set_quantity("a", 9).unwrap(), 4);
        assert_eq!(cart.items()[0].quantity, 4);

        assert_eq!(cart.set_quantity("a", -3).unwrap(), 0);
        assert!(cart.is_empty());

        assert!(matches!(
            cart.set_quantity("a", 1),
            Err(CoreError::NotInCart(_))
        ));
    }

    #[test]
    fn test_quantities_stay_within_stock() {
        let mut cart = Cart::new();
        let product = test_product("a", 1_000, 7);
        cart.add(&product, 1).unwrap();

        for requested in -5..=15 {
            if cart.is_empty() {
                cart.add(&product, 1).unwrap();
            }
            cart.set_quantity("a", requested).unwrap();
            for item in cart.items() {
                assert!(item.quantity >= 1 && item.quantity <= item.stock);
            }
        }
    }

    #[test]
    fn test_line_quantity_never_exceeds_limit() {
        let mut cart = Cart::new();
        let warehouse = test_product("a", 1_000, 5_000);

        cart.add(&warehouse, MAX_ITEM_QUANTITY).unwrap();
        assert_eq!(cart.add(&warehouse, 10).unwrap(), MAX_ITEM_QUANTITY);
        assert_eq!(cart.set_quantity("a", 4_000).unwrap(), MAX_ITEM_QUANTITY);
        assert!(cart.add(&test_product("b", 1_000, 5_000), MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_totals_with_discount() {
        let mut cart = Cart::new();
        cart.add(&test_product("a", 100_000, 5), 2).unwrap();
        cart.add(&test_product("b", 50_000, 5), 1).unwrap();

        let totals = CartTotals::new(&cart, Money::from_minor(10_000));
        assert_eq!(totals.subtotal.minor(), 250_000);
        assert_eq!(totals.total.minor(), 240_000);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add(&test_product("a", 1_000, 5), 1).unwrap();
        cart.add(&test_product("b", 1_000, 5), 1).unwrap();

        assert!(cart.remove("a"));
        assert!(!cart.remove("a"));
        cart.clear();
        assert!(cart.is_empty());
    }
}
