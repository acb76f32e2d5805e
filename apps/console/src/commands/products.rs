//! # Product Commands
//!
//! Finished goods: listing, the sales picker, and the selling-price editor
//! with its live profit and margin.

use pincorp_core::pricing::PriceQuote;
use pincorp_core::search::Page;
use pincorp_core::{Money, Product};
use pincorp_store::Store;
use serde::Serialize;
use tracing::debug;

use super::rejected;
use crate::error::ApiError;
use crate::state::ConfigState;

/// A product together with its price quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedProduct {
    pub product: Product,
    pub quote: PriceQuote,
    /// Selling price formatted for display.
    pub display_price: String,
}

impl PricedProduct {
    fn new(product: Product, config: &ConfigState) -> Self {
        PricedProduct {
            quote: product.quote(config.low_margin()),
            display_price: config.format_currency(product.selling_price),
            product,
        }
    }
}

pub fn list_products(
    store: &Store,
    config: &ConfigState,
    term: &str,
    page: usize,
) -> Result<Page<Product>, ApiError> {
    debug!(term = %term, page, "list_products command");
    store
        .products()
        .page(term, page, config.page_size)
        .map_err(rejected("list_products"))
}

/// Products with stock, for the sales desk picker.
pub fn available_products(store: &Store, term: &str) -> Result<Vec<Product>, ApiError> {
    debug!(term = %term, "available_products command");
    store
        .products()
        .available(term)
        .map_err(rejected("available_products"))
}

/// Updates the selling price and returns the new quote.
pub fn set_selling_price(
    store: &Store,
    config: &ConfigState,
    id: &str,
    price: Money,
) -> Result<PricedProduct, ApiError> {
    debug!(id = %id, price = %price, "set_selling_price command");
    let product = store
        .products()
        .set_selling_price(id, price)
        .map_err(rejected("set_selling_price"))?;
    Ok(PricedProduct::new(product, config))
}

/// Profit and margin at the product's current prices.
pub fn quote_product(
    store: &Store,
    config: &ConfigState,
    id: &str,
) -> Result<PricedProduct, ApiError> {
    let product = store.products().get(id).map_err(rejected("quote_product"))?;
    Ok(PricedProduct::new(product, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pincorp_store::{Collections, StoreConfig};

    fn store() -> Store {
        let collections = Collections {
            products: vec![
                Product {
                    id: "p1".to_string(),
                    name: "Battery-12V".to_string(),
                    sku: "BAT-12V".to_string(),
                    stock: 5,
                    cost_price: Money::from_minor(100_000),
                    selling_price: Money::zero(),
                },
                Product {
                    id: "p2".to_string(),
                    name: "Charger".to_string(),
                    sku: "CHG-01".to_string(),
                    stock: 0,
                    cost_price: Money::from_minor(50_000),
                    selling_price: Money::from_minor(80_000),
                },
            ],
            ..Collections::default()
        };
        Store::with_collections(StoreConfig::in_memory(), collections)
    }

    #[test]
    fn test_set_selling_price_quotes_margin() {
        let store = store();
        let config = ConfigState::default();

        let priced = set_selling_price(&store, &config, "p1", Money::from_minor(110_000)).unwrap();
        assert_eq!(priced.quote.profit.minor(), 10_000);
        assert_eq!(priced.quote.margin.bps(), 1_000);
        assert!(priced.quote.is_low_margin);
        assert_eq!(priced.display_price, "110.000 ₫");

        let priced = set_selling_price(&store, &config, "p1", Money::from_minor(150_000)).unwrap();
        assert!(!priced.quote.is_low_margin);
        assert_eq!(priced.product.cost_price.minor(), 100_000);
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = set_selling_price(
            &store(),
            &ConfigState::default(),
            "p1",
            Money::from_minor(-1),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_available_skips_empty_stock() {
        let store = store();
        let available = available_products(&store, "").unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "p1");

        let all = list_products(&store, &ConfigState::default(), "", 1).unwrap();
        assert_eq!(all.total_items, 2);
    }
}
