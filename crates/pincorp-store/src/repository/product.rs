//! # Product Repository
//!
//! Finished goods. Products appear when a production order completes; the
//! only field staff edit directly is the selling price.
//!
//! ## Who Changes What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field          Changed by                                              │
//! │  ─────          ──────────                                              │
//! │  stock          production completion (+), sale recording (−)           │
//! │  costPrice      production completion (order unit cost)                 │
//! │  sellingPrice   set_selling_price (this repository)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pincorp_core::pricing::PriceQuote;
use pincorp_core::search::{self, Page};
use pincorp_core::validation::validate_selling_price;
use pincorp_core::{Money, Product, Rate};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::Store;

/// Repository for finished products.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    store: Store,
}

impl ProductRepository {
    pub fn new(store: Store) -> Self {
        ProductRepository { store }
    }

    /// Products whose name or SKU contains `term`.
    pub fn list(&self, term: &str) -> StoreResult<Vec<Product>> {
        self.store
            .read(|c| search::filter(&c.products, term).into_iter().cloned().collect())
    }

    pub fn page(&self, term: &str, page: usize, page_size: usize) -> StoreResult<Page<Product>> {
        Ok(search::paginate(self.list(term)?, page, page_size))
    }

    /// Products with stock left, for the sales picker.
    pub fn available(&self, term: &str) -> StoreResult<Vec<Product>> {
        self.store.read(|c| {
            search::available_products(&c.products, term)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn get(&self, id: &str) -> StoreResult<Product> {
        self.store
            .read(|c| c.products.iter().find(|p| p.id == id).cloned())?
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    /// Updates the selling price. Cost price and stock are untouched.
    pub fn set_selling_price(&self, id: &str, price: Money) -> StoreResult<Product> {
        validate_selling_price(price)?;

        self.store.transaction(|c| {
            let product = c
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| StoreError::not_found("Product", id))?;
            debug!(id = %id, old = %product.selling_price, new = %price, "Setting selling price");
            product.selling_price = price;
            Ok(product.clone())
        })
    }

    /// Profit and margin for the product's current prices.
    pub fn quote(&self, id: &str, low_margin: Rate) -> StoreResult<PriceQuote> {
        Ok(self.get(id)?.quote(low_margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collections, StoreConfig};
    use pincorp_core::LOW_MARGIN_BPS;

    fn product(id: &str, stock: i64, cost: i64, selling: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Battery {id}"),
            sku: format!("BAT-{id}"),
            stock,
            cost_price: Money::from_minor(cost),
            selling_price: Money::from_minor(selling),
        }
    }

    fn store() -> Store {
        let collections = Collections {
            products: vec![product("12v", 4, 40_000, 0), product("24v", 0, 80_000, 120_000)],
            ..Collections::default()
        };
        Store::with_collections(StoreConfig::in_memory(), collections)
    }

    #[test]
    fn test_set_selling_price_only_touches_price() {
        let store = store();
        let repo = store.products();

        let updated = repo.set_selling_price("12v", Money::from_minor(46_000)).unwrap();
        assert_eq!(updated.selling_price.minor(), 46_000);
        assert_eq!(updated.cost_price.minor(), 40_000);
        assert_eq!(updated.stock, 4);
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let store = store();
        assert!(store
            .products()
            .set_selling_price("12v", Money::from_minor(-1))
            .is_err());
        assert!(matches!(
            store.products().set_selling_price("nope", Money::zero()),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_quote_flags_low_margin() {
        let store = store();
        let repo = store.products();
        let threshold = Rate::from_bps(LOW_MARGIN_BPS);

        repo.set_selling_price("12v", Money::from_minor(46_000)).unwrap();
        let quote = repo.quote("12v", threshold).unwrap();
        assert_eq!(quote.profit.minor(), 6_000);
        assert_eq!(quote.margin.bps(), 1_500);
        assert!(quote.is_low_margin);

        assert!(!repo.quote("24v", threshold).unwrap().is_low_margin);
    }

    #[test]
    fn test_available_skips_empty_stock() {
        let store = store();
        let available = store.products().available("").unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, "12v");
        assert_eq!(store.products().list("bat").unwrap().len(), 2);
    }
}
