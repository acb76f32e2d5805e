//! # BOM Repository
//!
//! The BOM registry, plus cost previews against the live material catalog.
//!
//! ## Cost Preview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  estimate("bom-battery", 3)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock ─► find BOM ─► costing::estimate(bom, 3, materials) ─► unlock     │
//! │                                                                         │
//! │  Line     Required  Stock  Sufficient  Cost                             │
//! │  Plate    6         10     yes         30.000                           │
//! │  Casing   3         3      yes         60.000                           │
//! │                                        ──────                           │
//! │                                        90.000                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A preview is advisory. Nothing is held between the preview and the order
//! being created, which re-checks under the store lock.

use pincorp_core::costing::{self, CostEstimate};
use pincorp_core::search::{self, Page};
use pincorp_core::validation::{validate_bom, validate_estimate_quantity};
use pincorp_core::{Bom, Money};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{new_id, Store};

/// Repository for BOMs.
#[derive(Debug, Clone)]
pub struct BomRepository {
    store: Store,
}

impl BomRepository {
    pub fn new(store: Store) -> Self {
        BomRepository { store }
    }

    /// BOMs whose product name or SKU contains `term`.
    pub fn list(&self, term: &str) -> StoreResult<Vec<Bom>> {
        self.store
            .read(|c| search::filter(&c.boms, term).into_iter().cloned().collect())
    }

    pub fn page(&self, term: &str, page: usize, page_size: usize) -> StoreResult<Page<Bom>> {
        Ok(search::paginate(self.list(term)?, page, page_size))
    }

    pub fn get(&self, id: &str) -> StoreResult<Bom> {
        self.store
            .read(|c| c.boms.iter().find(|b| b.id == id).cloned())?
            .ok_or_else(|| StoreError::not_found("BOM", id))
    }

    /// Creates a BOM (empty id) or fully replaces an existing one.
    ///
    /// SKUs are not required to be unique across BOMs.
    pub fn save(&self, mut bom: Bom) -> StoreResult<Bom> {
        bom.product_name = bom.product_name.trim().to_string();
        bom.product_sku = bom.product_sku.trim().to_string();
        validate_bom(&bom)?;

        let is_update = !bom.id.trim().is_empty();
        if !is_update {
            bom.id = new_id();
        }

        self.store.transaction(|c| {
            match c.boms.iter_mut().find(|b| b.id == bom.id) {
                Some(existing) => {
                    debug!(id = %bom.id, lines = bom.materials.len(), "Updating BOM");
                    *existing = bom.clone();
                }
                None if is_update => return Err(StoreError::not_found("BOM", &bom.id)),
                None => {
                    debug!(id = %bom.id, product = %bom.product_name, "Creating BOM");
                    c.boms.push(bom.clone());
                }
            }
            Ok(bom)
        })
    }

    /// Deletes a BOM once the operator has confirmed.
    ///
    /// Orders created from it keep their own copy of its name and SKU.
    pub fn delete(&self, id: &str, confirmed: bool) -> StoreResult<Bom> {
        if !confirmed {
            return Err(StoreError::confirmation_required("delete BOM"));
        }

        self.store.transaction(|c| {
            let pos = c
                .boms
                .iter()
                .position(|b| b.id == id)
                .ok_or_else(|| StoreError::not_found("BOM", id))?;
            debug!(id = %id, "Deleting BOM");
            Ok(c.boms.remove(pos))
        })
    }

    /// Live cost and sufficiency preview for producing `quantity` units.
    ///
    /// ## Returns
    /// * `Err(StoreError::NotFound)` - Unknown BOM
    /// * `Err(StoreError::Core)` - Quantity ≤ 0 or above the production
    ///   limit, or a materials cost above the amount ceiling
    pub fn estimate(&self, bom_id: &str, quantity: Decimal) -> StoreResult<CostEstimate> {
        validate_estimate_quantity(quantity)?;

        let estimate = self
            .store
            .read(|c| {
                c.boms
                    .iter()
                    .find(|b| b.id == bom_id)
                    .map(|bom| costing::estimate(bom, quantity, &c.materials))
            })?
            .ok_or_else(|| StoreError::not_found("BOM", bom_id))?;
        estimate.ensure_within_limit()?;
        Ok(estimate)
    }

    /// Estimated material cost of one unit, at current purchase prices.
    pub fn unit_cost(&self, bom_id: &str) -> StoreResult<Money> {
        self.store
            .read(|c| {
                c.boms
                    .iter()
                    .find(|b| b.id == bom_id)
                    .map(|bom| costing::bom_unit_cost(bom, &c.materials))
            })?
            .ok_or_else(|| StoreError::not_found("BOM", bom_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{battery_bom, workshop};
    use crate::store::StoreConfig;
    use pincorp_core::{BomMaterial, CoreError};

    #[test]
    fn test_estimate_battery_scenarios() {
        let store = workshop(StoreConfig::in_memory());
        let repo = store.boms();

        let three = repo.estimate("bom-battery", Decimal::from(3)).unwrap();
        assert!(three.is_stock_sufficient);
        assert_eq!(three.materials_cost.minor(), 90_000);

        let four = repo.estimate("bom-battery", Decimal::from(4)).unwrap();
        assert!(!four.is_stock_sufficient);
        assert_eq!(four.shortages().len(), 1);
        assert_eq!(four.shortages()[0].material_id, "casing");
    }

    #[test]
    fn test_estimate_rejects_out_of_range_quantities() {
        let store = workshop(StoreConfig::in_memory());
        let repo = store.boms();

        for quantity in [Decimal::ZERO, Decimal::from(-2), Decimal::MAX] {
            assert!(matches!(
                repo.estimate("bom-battery", quantity),
                Err(StoreError::Core(CoreError::Validation(_)))
            ));
        }
        assert!(repo.estimate("bom-battery", Decimal::new(25, 1)).is_ok());
    }

    #[test]
    fn test_unit_cost() {
        let store = workshop(StoreConfig::in_memory());
        assert_eq!(store.boms().unit_cost("bom-battery").unwrap().minor(), 30_000);
        assert!(matches!(
            store.boms().unit_cost("nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_create_assigns_fresh_id_and_allows_duplicate_sku() {
        let store = workshop(StoreConfig::in_memory());
        let repo = store.boms();

        let mut copy = battery_bom();
        copy.id = String::new();
        copy.product_name = "Battery-12V (sealed)".to_string();

        let saved = repo.save(copy).unwrap();
        assert_ne!(saved.id, "bom-battery");
        assert_eq!(repo.list("BAT-12V").unwrap().len(), 2);
    }

    #[test]
    fn test_save_rejects_empty_name_or_lines() {
        let store = workshop(StoreConfig::in_memory());
        let repo = store.boms();

        let mut unnamed = battery_bom();
        unnamed.product_name = "  ".to_string();
        assert!(matches!(repo.save(unnamed), Err(StoreError::Core(CoreError::Validation(_)))));

        let mut empty = battery_bom();
        empty.materials.clear();
        assert!(repo.save(empty).is_err());

        assert_eq!(repo.get("bom-battery").unwrap(), battery_bom());
    }

    #[test]
    fn test_update_preserves_id() {
        let store = workshop(StoreConfig::in_memory());
        let repo = store.boms();

        let mut bom = battery_bom();
        bom.materials.push(BomMaterial {
            material_id: "acid".to_string(),
            quantity: Decimal::new(5, 1),
        });
        repo.save(bom).unwrap();

        assert_eq!(repo.list("").unwrap().len(), 1);
        assert_eq!(repo.get("bom-battery").unwrap().materials.len(), 3);
    }

    #[test]
    fn test_delete() {
        let store = workshop(StoreConfig::in_memory());
        assert!(store.boms().delete("bom-battery", false).is_err());
        store.boms().delete("bom-battery", true).unwrap();
        assert!(store.boms().list("").unwrap().is_empty());
    }
}
