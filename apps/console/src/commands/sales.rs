//! # Sales Desk Commands
//!
//! Commands that build up the sale at the counter and record it.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout                                          │
//! │                                                                         │
//! │  desk lock held ─────────────────────────────────────────────────────┐  │
//! │  │                                                                   │  │
//! │  │  1. draft()          empty cart / no payment / bad discount ──► ✗ │  │
//! │  │  2. record_sale()    stock re-checked and decremented together    │  │
//! │  │                      any line short ───────────────────────────► ✗ │  │
//! │  │  3. reset()          cart, discount, customer, payment cleared    │  │
//! │  └───────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ✗ = nothing stored, desk untouched                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pincorp_core::cart::CartTotals;
use pincorp_core::checkout::{Checkout, CustomerSelection};
use pincorp_core::search::Page;
use pincorp_core::{CartItem, Money, Operator, PaymentMethod, Sale};
use pincorp_store::Store;
use serde::Serialize;
use tracing::{debug, info};

use super::rejected;
use crate::error::ApiError;
use crate::state::{ConfigState, SalesDeskState};

/// What the checkout panel shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskResponse {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    pub customer: CustomerSelection,
    pub payment_method: Option<PaymentMethod>,
}

impl From<&Checkout> for DeskResponse {
    fn from(desk: &Checkout) -> Self {
        DeskResponse {
            items: desk.cart().items().to_vec(),
            totals: desk.totals(),
            customer: desk.customer().clone(),
            payment_method: desk.payment_method(),
        }
    }
}

pub fn get_desk(desk: &SalesDeskState) -> Result<DeskResponse, ApiError> {
    desk.with_desk(|d| DeskResponse::from(d))
}

/// Adds a product line, capped at the product's current stock.
pub fn add_to_cart(
    store: &Store,
    desk: &SalesDeskState,
    product_id: &str,
    quantity: i64,
) -> Result<DeskResponse, ApiError> {
    debug!(product_id = %product_id, quantity, "add_to_cart command");
    let product = store
        .products()
        .get(product_id)
        .map_err(rejected("add_to_cart"))?;

    desk.with_desk_mut(|d| -> Result<DeskResponse, ApiError> {
        d.cart_mut()
            .add(&product, quantity)
            .map_err(rejected("add_to_cart"))?;
        Ok(DeskResponse::from(&*d))
    })?
}

/// Sets a line's quantity; zero removes it.
pub fn set_cart_quantity(
    desk: &SalesDeskState,
    product_id: &str,
    quantity: i64,
) -> Result<DeskResponse, ApiError> {
    debug!(product_id = %product_id, quantity, "set_cart_quantity command");
    desk.with_desk_mut(|d| -> Result<DeskResponse, ApiError> {
        d.cart_mut()
            .set_quantity(product_id, quantity)
            .map_err(rejected("set_cart_quantity"))?;
        Ok(DeskResponse::from(&*d))
    })?
}

pub fn remove_from_cart(desk: &SalesDeskState, product_id: &str) -> Result<DeskResponse, ApiError> {
    debug!(product_id = %product_id, "remove_from_cart command");
    desk.with_desk_mut(|d| -> Result<DeskResponse, ApiError> {
        if !d.cart_mut().remove(product_id) {
            return Err(ApiError::not_found("Cart line", product_id));
        }
        Ok(DeskResponse::from(&*d))
    })?
}

pub fn set_discount(desk: &SalesDeskState, discount: Money) -> Result<DeskResponse, ApiError> {
    debug!(discount = %discount, "set_discount command");
    desk.with_desk_mut(|d| -> Result<DeskResponse, ApiError> {
        d.set_discount(discount).map_err(rejected("set_discount"))?;
        Ok(DeskResponse::from(&*d))
    })?
}

/// Picks a registered customer for the sale.
pub fn select_customer(
    store: &Store,
    desk: &SalesDeskState,
    customer_id: &str,
) -> Result<DeskResponse, ApiError> {
    debug!(customer_id = %customer_id, "select_customer command");
    let customer = store
        .customers()
        .get(customer_id)
        .map_err(rejected("select_customer"))?;

    desk.with_desk_mut(|d| {
        d.select_customer(&customer);
        DeskResponse::from(&*d)
    })
}

/// Registers a customer from the checkout panel and selects them.
pub fn register_and_select_customer(
    store: &Store,
    desk: &SalesDeskState,
    name: &str,
    phone: &str,
    address: Option<String>,
) -> Result<DeskResponse, ApiError> {
    debug!(name = %name, "register_and_select_customer command");
    let customer = store
        .customers()
        .register(name, phone, address)
        .map_err(rejected("register_and_select_customer"))?;

    desk.with_desk_mut(|d| {
        d.select_customer(&customer);
        DeskResponse::from(&*d)
    })
}

/// Types a walk-in buyer's name. Blank falls back to the default name.
pub fn set_walk_in_name(desk: &SalesDeskState, name: &str) -> Result<DeskResponse, ApiError> {
    desk.with_desk_mut(|d| {
        d.set_walk_in_name(name);
        DeskResponse::from(&*d)
    })
}

pub fn set_payment_method(
    desk: &SalesDeskState,
    method: PaymentMethod,
) -> Result<DeskResponse, ApiError> {
    desk.with_desk_mut(|d| {
        d.set_payment_method(method);
        DeskResponse::from(&*d)
    })
}

/// Records the sale and clears the desk.
///
/// The desk stays locked from draft to reset, so no cart edit can slip in
/// between. On any error nothing is stored and the desk is left as it was.
pub fn checkout(
    store: &Store,
    desk: &SalesDeskState,
    operator: &Operator,
) -> Result<Sale, ApiError> {
    debug!(operator = %operator.name, "checkout command");
    desk.with_desk_mut(|d| -> Result<Sale, ApiError> {
        let draft = d.draft().map_err(rejected("checkout"))?;
        let sale = store
            .sales()
            .record_sale(draft, operator)
            .map_err(rejected("checkout"))?;
        d.reset();
        info!(sale_id = %sale.id, total = %sale.total, "Checkout complete");
        Ok(sale)
    })?
}

/// Lists recorded sales, newest first.
pub fn list_sales(
    store: &Store,
    config: &ConfigState,
    page: usize,
) -> Result<Page<Sale>, ApiError> {
    debug!(page, "list_sales command");
    store
        .sales()
        .page(page, config.page_size)
        .map_err(rejected("list_sales"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pincorp_core::{Product, WALK_IN_CUSTOMER_NAME};
    use pincorp_store::{Collections, StoreConfig};

    fn store() -> Store {
        let collections = Collections {
            products: vec![Product {
                id: "p1".to_string(),
                name: "Battery-12V".to_string(),
                sku: "BAT-12V".to_string(),
                stock: 5,
                cost_price: Money::from_minor(60_000),
                selling_price: Money::from_minor(100_000),
            }],
            ..Collections::default()
        };
        Store::with_collections(StoreConfig::in_memory(), collections)
    }

    fn operator() -> Operator {
        Operator {
            id: "u1".to_string(),
            name: "Lan".to_string(),
        }
    }

    #[test]
    fn test_checkout_records_and_resets() {
        let store = store();
        let desk = SalesDeskState::new();

        add_to_cart(&store, &desk, "p1", 3).unwrap();
        set_discount(&desk, Money::from_minor(10_000)).unwrap();
        let view = set_payment_method(&desk, PaymentMethod::Cash).unwrap();
        assert_eq!(view.totals.subtotal.minor(), 300_000);
        assert_eq!(view.totals.total.minor(), 290_000);

        let sale = checkout(&store, &desk, &operator()).unwrap();
        assert_eq!(sale.total.minor(), 290_000);
        assert_eq!(sale.customer.name, WALK_IN_CUSTOMER_NAME);
        assert_eq!(sale.user_name, "Lan");
        assert_eq!(store.products().get("p1").unwrap().stock, 2);

        let view = get_desk(&desk).unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.payment_method, None);
        assert_eq!(list_sales(&store, &ConfigState::default(), 1).unwrap().total_items, 1);
    }

    #[test]
    fn test_add_caps_at_stock() {
        let store = store();
        let desk = SalesDeskState::new();
        let view = add_to_cart(&store, &desk, "p1", 9).unwrap();
        assert_eq!(view.items[0].quantity, 5);

        let view = set_cart_quantity(&desk, "p1", 0).unwrap();
        assert!(view.items.is_empty());
        assert_eq!(
            remove_from_cart(&desk, "p1").unwrap_err().code,
            ErrorCode::NotFound
        );
    }

    #[test]
    fn test_incomplete_checkout_keeps_desk() {
        let store = store();
        let desk = SalesDeskState::new();

        let err = checkout(&store, &desk, &operator()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutIncomplete);

        add_to_cart(&store, &desk, "p1", 2).unwrap();
        let err = checkout(&store, &desk, &operator()).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckoutIncomplete);

        set_payment_method(&desk, PaymentMethod::Bank).unwrap();
        set_discount(&desk, Money::from_minor(500_000)).unwrap();
        let err = checkout(&store, &desk, &operator()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(get_desk(&desk).unwrap().items.len(), 1);
        assert_eq!(store.products().get("p1").unwrap().stock, 5);
    }

    #[test]
    fn test_new_customer_is_selected() {
        let store = store();
        let desk = SalesDeskState::new();

        let view =
            register_and_select_customer(&store, &desk, "Trần Văn An", "0901234567", None).unwrap();
        match view.customer {
            CustomerSelection::Registered { customer } => assert_eq!(customer.name, "Trần Văn An"),
            other => panic!("expected a registered customer, got {other:?}"),
        }

        add_to_cart(&store, &desk, "p1", 1).unwrap();
        set_payment_method(&desk, PaymentMethod::Bank).unwrap();
        let sale = checkout(&store, &desk, &operator()).unwrap();
        assert_eq!(sale.customer.phone.as_deref(), Some("0901234567"));
    }

    #[test]
    fn test_unknown_customer() {
        let err = select_customer(&store(), &SalesDeskState::new(), "nobody").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
