//! # Sale Repository
//!
//! The sales ledger: recording checkouts, listing them, and reporting.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record_sale(draft, operator)                         │
//! │                                                                         │
//! │  SaleDraft (from Checkout::draft)                                       │
//! │       │                                                                 │
//! │       ▼  checkout::reconcile: quantities, prices, discount checked,     │
//! │       │  subtotal and total recomputed from the lines                   │
//! │       ▼                                                                 │
//! │  ┌─────────────── one transaction ───────────────┐                      │
//! │  │ 1. every line: product exists, stock ≥ qty    │                      │
//! │  │ 2. every line: product.stock −= qty           │                      │
//! │  │ 3. stamp id + date + operator, append Sale    │                      │
//! │  └───────────────────────────────────────────────┘                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale (immutable from here on)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A line that fails step 1 aborts the whole sale; no stock moves.

use chrono::{DateTime, Utc};
use pincorp_core::checkout;
use pincorp_core::report::{build_report, ReportWindow, SalesReport};
use pincorp_core::search::{self, Page};
use pincorp_core::{CoreError, Operator, Product, Sale, SaleDraft};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::{new_id, Store};

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    store: Store,
}

/// Checks every line of `draft` against current stock, then decrements.
fn take_stock(products: &mut [Product], draft: &SaleDraft) -> StoreResult<()> {
    let mut needs: Vec<(usize, i64)> = Vec::with_capacity(draft.items.len());

    for item in &draft.items {
        let pos = products
            .iter()
            .position(|p| p.id == item.product_id)
            .ok_or_else(|| StoreError::not_found("Product", &item.product_id))?;
        match needs.iter_mut().find(|(i, _)| *i == pos) {
            Some((_, quantity)) => *quantity += item.quantity,
            None => needs.push((pos, item.quantity)),
        }
    }

    for &(pos, requested) in &needs {
        let product = &products[pos];
        if product.stock < requested {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: product.stock,
                requested,
            }
            .into());
        }
    }

    for (pos, requested) in needs {
        products[pos].stock -= requested;
    }
    Ok(())
}

impl SaleRepository {
    pub fn new(store: Store) -> Self {
        SaleRepository { store }
    }

    /// Records a checkout stamped now.
    pub fn record_sale(&self, draft: SaleDraft, operator: &Operator) -> StoreResult<Sale> {
        self.record_sale_at(draft, operator, Utc::now())
    }

    /// Records a checkout with the given sale date.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - Stored sale with id, date and operator assigned
    /// * `Err(StoreError::NotFound)` - A line's product no longer exists
    /// * `Err(StoreError::Core)` - Empty draft, a line or discount out of
    ///   bounds, or not enough stock
    pub fn record_sale_at(
        &self,
        draft: SaleDraft,
        operator: &Operator,
        date: DateTime<Utc>,
    ) -> StoreResult<Sale> {
        let draft = checkout::reconcile(draft)?;

        self.store.transaction(|c| {
            take_stock(&mut c.products, &draft)?;

            let sale = draft.into_sale(new_id(), date, operator);
            info!(
                id = %sale.id,
                lines = sale.items.len(),
                total = %sale.total,
                customer = %sale.customer.name,
                payment = ?sale.payment_method,
                "Sale recorded"
            );
            c.sales.push(sale.clone());
            Ok(sale)
        })
    }

    /// All sales, newest first.
    pub fn list(&self) -> StoreResult<Vec<Sale>> {
        self.store.read(|c| {
            let mut sales = c.sales.clone();
            sales.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
            sales
        })
    }

    pub fn page(&self, page: usize, page_size: usize) -> StoreResult<Page<Sale>> {
        Ok(search::paginate(self.list()?, page, page_size))
    }

    pub fn get(&self, id: &str) -> StoreResult<Sale> {
        self.store
            .read(|c| c.sales.iter().find(|s| s.id == id).cloned())?
            .ok_or_else(|| StoreError::not_found("Sale", id))
    }

    /// Revenue, cost and profit over the window.
    pub fn report(&self, window: &ReportWindow) -> StoreResult<SalesReport> {
        let report = self.store.read(|c| build_report(&c.sales, window))?;
        debug!(
            start = %window.start,
            end = %window.end,
            sales = report.sale_count,
            "Report built"
        );
        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Collections, StoreConfig};
    use chrono::{FixedOffset, NaiveDate};
    use pincorp_core::checkout::Checkout;
    use pincorp_core::{Money, PaymentMethod};

    fn product(id: &str, price: i64, cost: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            sku: format!("SKU-{id}"),
            stock,
            cost_price: Money::from_minor(cost),
            selling_price: Money::from_minor(price),
        }
    }

    fn store() -> Store {
        let collections = Collections {
            products: vec![product("a", 100_000, 60_000, 5), product("b", 50_000, 30_000, 2)],
            ..Collections::default()
        };
        Store::with_collections(StoreConfig::in_memory(), collections)
    }

    fn cashier() -> Operator {
        Operator {
            id: "u1".to_string(),
            name: "Thu Ngân".to_string(),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .unwrap()
            .and_utc()
    }

    /// Cart with A×2 and B×1, discount 10 000, paid in cash.
    fn draft(store: &Store) -> SaleDraft {
        let mut desk = Checkout::new();
        desk.cart_mut().add(&store.products().get("a").unwrap(), 2).unwrap();
        desk.cart_mut().add(&store.products().get("b").unwrap(), 1).unwrap();
        desk.set_discount(Money::from_minor(10_000)).unwrap();
        desk.set_payment_method(PaymentMethod::Cash);
        desk.draft().unwrap()
    }

    #[test]
    fn test_record_sale_stamps_and_decrements_stock() {
        let store = store();
        let sale = store
            .sales()
            .record_sale_at(draft(&store), &cashier(), at(5, 3))
            .unwrap();

        assert!(!sale.id.is_empty());
        assert_eq!(sale.subtotal.minor(), 250_000);
        assert_eq!(sale.total.minor(), 240_000);
        assert_eq!(sale.user_name, "Thu Ngân");
        assert_eq!(sale.customer.name, "Khách lẻ");

        assert_eq!(store.products().get("a").unwrap().stock, 3);
        assert_eq!(store.products().get("b").unwrap().stock, 1);
        assert_eq!(store.sales().get(&sale.id).unwrap(), sale);
    }

    #[test]
    fn test_insufficient_stock_rejects_whole_sale() {
        let store = store();
        let first = draft(&store);
        let second = draft(&store);
        let repo = store.sales();

        repo.record_sale(first, &cashier()).unwrap();
        repo.record_sale(second.clone(), &cashier()).unwrap();

        // B is now sold out; A still has 1 left.
        assert!(matches!(
            repo.record_sale(second, &cashier()),
            Err(StoreError::Core(CoreError::InsufficientStock { .. }))
        ));
        assert_eq!(store.products().get("a").unwrap().stock, 1);
        assert_eq!(repo.list().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_product_rejects_sale() {
        let store = store();
        let mut sale = draft(&store);
        sale.items[0].product_id = "gone".to_string();

        assert!(matches!(
            store.sales().record_sale(sale, &cashier()),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(store.products().get("b").unwrap().stock, 2);
    }

    #[test]
    fn test_non_positive_quantity_never_adds_stock() {
        let store = store();
        let repo = store.sales();

        for quantity in [-10, 0] {
            let mut sale = draft(&store);
            sale.items[0].quantity = quantity;
            assert!(matches!(
                repo.record_sale(sale, &cashier()),
                Err(StoreError::Core(CoreError::Validation(_)))
            ));
        }
        assert_eq!(store.products().get("a").unwrap().stock, 5);
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_stored_totals_follow_the_lines() {
        let store = store();
        let repo = store.sales();

        let mut forged = draft(&store);
        forged.subtotal = Money::from_minor(999);
        forged.total = Money::from_minor(1);
        let sale = repo.record_sale(forged, &cashier()).unwrap();
        assert_eq!(sale.subtotal.minor(), 250_000);
        assert_eq!(sale.total.minor(), 240_000);

        let mut generous = draft(&store);
        generous.discount = Money::from_minor(300_000);
        assert!(repo.record_sale(generous, &cashier()).is_err());
        assert_eq!(store.products().get("a").unwrap().stock, 3);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_newest_first_and_report() {
        let store = store();
        let repo = store.sales();
        let older = repo.record_sale_at(draft(&store), &cashier(), at(5, 3)).unwrap();
        let newer = repo.record_sale_at(draft(&store), &cashier(), at(6, 3)).unwrap();

        let ids: Vec<String> = repo.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let report = repo.report(&ReportWindow::new(day(5), day(5), offset)).unwrap();
        assert_eq!(report.sale_count, 1);
        assert_eq!(report.total_revenue.minor(), 240_000);
        assert_eq!(report.total_cost.minor(), 150_000);
        assert_eq!(report.total_profit.minor(), 90_000);
    }
}
