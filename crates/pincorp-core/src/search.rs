//! # Search and Pagination
//!
//! Every catalog screen follows the same pattern: a free-text filter over
//! name/SKU, then a page of results.
//!
//! ```text
//!   all items ──► filter(term) ──► paginate(page, size) ──► Page<T>
//!                 (empty term =     (1-based, ceil(total / size)
//!                  everything)       pages)
//! ```
//!
//! The pickers (BOM material picker, customer search) differ: an empty term
//! returns nothing, because they drive a dropdown rather than a list.

use serde::Serialize;

use crate::types::{Bom, BomMaterial, Customer, Material, Product};
use crate::{DEFAULT_PAGE_SIZE, MAX_PICKER_RESULTS};

// =============================================================================
// Searchable
// =============================================================================

/// A record that can be matched against a lower-cased search term.
pub trait Searchable {
    fn matches(&self, term: &str) -> bool;
}

fn contains_ci(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

impl Searchable for Material {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.name, term) || contains_ci(&self.sku, term)
    }
}

impl Searchable for Bom {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.product_name, term) || contains_ci(&self.product_sku, term)
    }
}

impl Searchable for Product {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.name, term) || contains_ci(&self.sku, term)
    }
}

/// Customers match on name (case-insensitive) or on a phone substring.
impl Searchable for Customer {
    fn matches(&self, term: &str) -> bool {
        contains_ci(&self.name, term) || self.phone.contains(term)
    }
}

/// Filters `items` by a case-insensitive substring. An empty term keeps all.
pub fn filter<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.matches(&term)).collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served.
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slices `items` into the requested 1-based page.
///
/// Page 0 is treated as page 1 and a page size of 0 falls back to
/// [`DEFAULT_PAGE_SIZE`]. A page past the end is empty.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let page = page.max(1);
    let page_size = if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

// =============================================================================
// Pickers
// =============================================================================

/// Materials offered when adding a line to a BOM.
///
/// Empty term returns nothing. Materials already on the BOM are excluded
/// and at most [`MAX_PICKER_RESULTS`] are returned.
pub fn candidate_materials<'a>(
    materials: &'a [Material],
    existing: &[BomMaterial],
    term: &str,
) -> Vec<&'a Material> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }
    materials
        .iter()
        .filter(|m| !existing.iter().any(|line| line.material_id == m.id))
        .filter(|m| m.matches(&term))
        .take(MAX_PICKER_RESULTS)
        .collect()
}

/// Products that can be added to a cart: stock > 0, filtered by name/SKU.
pub fn available_products<'a>(products: &'a [Product], term: &str) -> Vec<&'a Product> {
    filter(products, term)
        .into_iter()
        .filter(|p| p.stock > 0)
        .collect()
}

/// Customer lookup for the checkout panel. Empty term returns nothing.
pub fn search_customers<'a>(customers: &'a [Customer], term: &str) -> Vec<&'a Customer> {
    if term.trim().is_empty() {
        return Vec::new();
    }
    filter(customers, term)
}

// =============================================================================
// Unit Tests
// =============================================================================
