//! # Material Repository
//!
//! The material catalog: list, save (create or full replace) and delete.
//!
//! Stock is never adjusted here on its own. It moves through production
//! orders, or through a full record edit.

use pincorp_core::search::{self, Page};
use pincorp_core::validation::validate_material;
use pincorp_core::{BomMaterial, Material, Money, Unit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{new_id, Store};

/// A material as submitted by the catalog editor.
///
/// An empty or missing `id` creates a new material. A missing `stock`
/// keeps the stored stock on update and starts at zero on create.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInput {
    pub id: Option<String>,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub unit: Unit,
    pub purchase_price: Money,
    pub stock: Option<Decimal>,
    pub supplier: Option<String>,
    pub description: Option<String>,
}

/// Repository for the material catalog.
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    store: Store,
}

impl MaterialRepository {
    pub fn new(store: Store) -> Self {
        MaterialRepository { store }
    }

    /// Materials whose name or SKU contains `term`, in catalog order.
    pub fn list(&self, term: &str) -> StoreResult<Vec<Material>> {
        self.store
            .read(|c| search::filter(&c.materials, term).into_iter().cloned().collect())
    }

    /// One page of [`list`](Self::list).
    pub fn page(&self, term: &str, page: usize, page_size: usize) -> StoreResult<Page<Material>> {
        Ok(search::paginate(self.list(term)?, page, page_size))
    }

    pub fn get(&self, id: &str) -> StoreResult<Material> {
        self.store
            .read(|c| c.materials.iter().find(|m| m.id == id).cloned())?
            .ok_or_else(|| StoreError::not_found("Material", id))
    }

    /// Creates or fully replaces a material.
    ///
    /// ## Returns
    /// * `Ok(Material)` - The stored record, with its id assigned
    /// * `Err(StoreError::NotFound)` - `id` given but unknown
    /// * `Err(StoreError::Core)` - Empty name, price ≤ 0 or negative stock
    pub fn save(&self, input: MaterialInput) -> StoreResult<Material> {
        let supplied = input.id.filter(|id| !id.trim().is_empty());
        let is_update = supplied.is_some();
        let id = supplied.unwrap_or_else(new_id);
        let keep_stock = input.stock.is_none();

        let mut material = Material {
            id,
            name: input.name.trim().to_string(),
            sku: input.sku.trim().to_string(),
            unit: input.unit,
            purchase_price: input.purchase_price,
            stock: input.stock.unwrap_or(Decimal::ZERO),
            supplier: input.supplier,
            description: input.description,
        };
        validate_material(&material)?;

        self.store.transaction(|c| {
            match c.materials.iter_mut().find(|m| m.id == material.id) {
                Some(existing) => {
                    debug!(id = %material.id, keep_stock, "Updating material");
                    if keep_stock {
                        material.stock = existing.stock;
                    }
                    *existing = material.clone();
                }
                None if is_update => {
                    return Err(StoreError::not_found("Material", &material.id));
                }
                None => {
                    debug!(id = %material.id, name = %material.name, "Creating material");
                    c.materials.push(material.clone());
                }
            }
            Ok(material)
        })
    }

    /// Deletes a material once the operator has confirmed.
    ///
    /// BOM lines pointing at it are left in place and resolve as
    /// unknown from then on.
    pub fn delete(&self, id: &str, confirmed: bool) -> StoreResult<Material> {
        if !confirmed {
            return Err(StoreError::confirmation_required("delete material"));
        }

        self.store.transaction(|c| {
            let pos = c
                .materials
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| StoreError::not_found("Material", id))?;
            debug!(id = %id, "Deleting material");
            Ok(c.materials.remove(pos))
        })
    }

    /// Picker results for a BOM editor already holding `existing` lines.
    pub fn candidates_for_bom(
        &self,
        existing: &[BomMaterial],
        term: &str,
    ) -> StoreResult<Vec<Material>> {
        self.store.read(|c| {
            search::candidate_materials(&c.materials, existing, term)
                .into_iter()
                .cloned()
                .collect()
        })
    }
}
