//! # Material Commands
//!
//! Material catalog: list, save, delete, and the BOM editor picker.

use pincorp_core::search::Page;
use pincorp_core::{BomMaterial, Material};
use pincorp_store::{MaterialInput, Store};
use tracing::debug;

use super::rejected;
use crate::error::ApiError;
use crate::state::ConfigState;

/// Lists one page of materials matching `term`.
pub fn list_materials(
    store: &Store,
    config: &ConfigState,
    term: &str,
    page: usize,
) -> Result<Page<Material>, ApiError> {
    debug!(term = %term, page, "list_materials command");
    store
        .materials()
        .page(term, page, config.page_size)
        .map_err(rejected("list_materials"))
}

/// Creates a material (no id) or replaces an existing one.
pub fn save_material(store: &Store, input: MaterialInput) -> Result<Material, ApiError> {
    debug!(id = ?input.id, name = %input.name, "save_material command");
    store
        .materials()
        .save(input)
        .map_err(rejected("save_material"))
}

/// Deletes a material. Without `confirmed` nothing changes.
pub fn delete_material(store: &Store, id: &str, confirmed: bool) -> Result<Material, ApiError> {
    debug!(id = %id, confirmed, "delete_material command");
    store
        .materials()
        .delete(id, confirmed)
        .map_err(rejected("delete_material"))
}

/// Materials that can still be added to a BOM holding `existing`.
pub fn material_candidates(
    store: &Store,
    existing: &[BomMaterial],
    term: &str,
) -> Result<Vec<Material>, ApiError> {
    store
        .materials()
        .candidates_for_bom(existing, term)
        .map_err(rejected("material_candidates"))
}
