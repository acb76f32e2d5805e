//! # Repository Module
//!
//! Typed access to each collection the store owns.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository per Collection                        │
//! │                                                                         │
//! │  Console command                                                        │
//! │       │                                                                 │
//! │       │  store.production().create_order(request)                       │
//! │       ▼                                                                 │
//! │  ProductionRepository                                                   │
//! │  ├── plan(&self, request)          read   → CostEstimate                │
//! │  ├── create_order(&self, request)  write  → ProductionOrder             │
//! │  └── set_status(&self, id, to, ok) write  → ProductionOrder             │
//! │       │                                                                 │
//! │       │  store.transaction(|c| pincorp_core::production::...)           │
//! │       ▼                                                                 │
//! │  Collections (behind the store lock)                                    │
//! │                                                                         │
//! │  Repositories hold no data of their own: business rules live in         │
//! │  pincorp-core, ownership and atomicity live in Store.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MaterialRepository`](material::MaterialRepository) - Material catalog
//! - [`BomRepository`](bom::BomRepository) - BOM registry and cost preview
//! - [`ProductRepository`](product::ProductRepository) - Finished goods and pricing
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer registry
//! - [`ProductionRepository`](production::ProductionRepository) - Order lifecycle
//! - [`SaleRepository`](sale::SaleRepository) - Sales ledger and reports

pub mod bom;
pub mod customer;
pub mod material;
pub mod product;
pub mod production;
pub mod sale;
