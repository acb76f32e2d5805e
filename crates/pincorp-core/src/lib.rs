//! # pincorp-core: Pure Business Logic for the PinCorp Workshop
//!
//! This crate is the **heart** of the workshop back office. It contains the
//! production economics engine and its downstream consumers as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PinCorp Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console (`pincorp`)                          │   │
//! │  │    materials ──► boms ──► production ──► sell ──► report        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ command functions                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    pincorp-store (state owner)                  │   │
//! │  │    repositories, single-writer transactions, snapshots         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pincorp-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  costing  │  │ production │  │   cart    │  │  report   │  │   │
//! │  │   │ BOM × qty │  │ lifecycle  │  │ checkout  │  │ totals    │  │   │
//! │  │   │ shortages │  │ stock moves│  │ SaleDraft │  │ daily     │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO LOGGING • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Material, Bom, ProductionOrder, Sale, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Editor validation rules
//! - [`search`] - List filtering and pagination
//! - [`costing`] - Production Cost Engine
//! - [`production`] - Production Order Lifecycle
//! - [`pricing`] - Product profit and margin
//! - [`cart`] / [`checkout`] - Sales Register
//! - [`report`] - Report Aggregator
//!
//! ## Example Usage
//!
//! ```rust
//! use pincorp_core::costing::estimate;
//! use pincorp_core::{Bom, BomMaterial, Material, Money, Unit};
//! use rust_decimal::Decimal;
//!
//! let plate = Material {
//!     id: "plate".into(),
//!     name: "Plate".into(),
//!     sku: "PL".into(),
//!     unit: Unit::Piece,
//!     purchase_price: Money::from_minor(5_000),
//!     stock: Decimal::from(10),
//!     supplier: None,
//!     description: None,
//! };
//! let bom = Bom {
//!     id: "b1".into(),
//!     product_name: "Battery-12V".into(),
//!     product_sku: "PIN-12V".into(),
//!     materials: vec![BomMaterial { material_id: "plate".into(), quantity: Decimal::from(2) }],
//!     notes: None,
//! };
//!
//! let cost = estimate(&bom, Decimal::from(3), &[plate]);
//! assert!(cost.is_stock_sufficient);
//! assert_eq!(cost.materials_cost.minor(), 30_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod costing;
pub mod error;
pub mod money;
pub mod pricing;
pub mod production;
pub mod report;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, Shortage, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Customer name recorded on a sale with no registered buyer.
pub const WALK_IN_CUSTOMER_NAME: &str = "Khách lẻ";

/// Rows per page when the caller does not choose.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Margins below this many basis points (20%) are flagged on the product editor.
pub const LOW_MARGIN_BPS: i64 = 2_000;

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of one product on a cart line.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum output of a single production order.
pub const MAX_PRODUCTION_QUANTITY: i64 = 100_000;

/// Ceiling for any price, cost or total, in đồng (one trillion).
///
/// `MAX_CART_ITEMS` lines of `MAX_ITEM_QUANTITY` at this price stay within i64.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Maximum results offered by the BOM material picker.
pub const MAX_PICKER_RESULTS: usize = 10;

/// Maximum length of a free-text search term.
pub const MAX_SEARCH_LENGTH: usize = 100;
