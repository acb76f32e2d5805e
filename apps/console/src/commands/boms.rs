//! # BOM Commands
//!
//! BOM registry edits and the live cost preview shown in the BOM and
//! production editors.

use pincorp_core::costing::CostEstimate;
use pincorp_core::search::Page;
use pincorp_core::{Bom, Money};
use pincorp_store::Store;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::rejected;
use crate::error::ApiError;
use crate::state::ConfigState;

/// Cost preview for a BOM and quantity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BomCostResponse {
    pub bom_id: String,
    pub product_name: String,
    /// Material cost of one unit at current purchase prices.
    pub unit_cost: Money,
    pub estimate: CostEstimate,
}

pub fn list_boms(
    store: &Store,
    config: &ConfigState,
    term: &str,
    page: usize,
) -> Result<Page<Bom>, ApiError> {
    debug!(term = %term, page, "list_boms command");
    store
        .boms()
        .page(term, page, config.page_size)
        .map_err(rejected("list_boms"))
}

pub fn get_bom(store: &Store, id: &str) -> Result<Bom, ApiError> {
    store.boms().get(id).map_err(rejected("get_bom"))
}

/// Creates a BOM (empty id) or replaces an existing one.
pub fn save_bom(store: &Store, bom: Bom) -> Result<Bom, ApiError> {
    debug!(id = %bom.id, product = %bom.product_name, "save_bom command");
    store.boms().save(bom).map_err(rejected("save_bom"))
}

pub fn delete_bom(store: &Store, id: &str, confirmed: bool) -> Result<Bom, ApiError> {
    debug!(id = %id, confirmed, "delete_bom command");
    store
        .boms()
        .delete(id, confirmed)
        .map_err(rejected("delete_bom"))
}

/// Requirements, stock sufficiency and material cost for `quantity` units.
pub fn bom_cost(store: &Store, id: &str, quantity: Decimal) -> Result<BomCostResponse, ApiError> {
    debug!(id = %id, quantity = %quantity, "bom_cost command");
    let boms = store.boms();
    let estimate = boms.estimate(id, quantity).map_err(rejected("bom_cost"))?;
    let bom = boms.get(id).map_err(rejected("bom_cost"))?;
    let unit_cost = boms.unit_cost(id).map_err(rejected("bom_cost"))?;

    Ok(BomCostResponse {
        bom_id: bom.id,
        product_name: bom.product_name,
        unit_cost,
        estimate,
    })
}
