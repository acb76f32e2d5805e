//! # pincorp-store: Application State Owner for the PinCorp Workshop
//!
//! This crate owns every entity collection of the workshop and is the only
//! place they change. Business rules come from `pincorp-core`; this crate
//! adds ownership, ids, timestamps, atomicity and persistence.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PinCorp Data Flow                                │
//! │                                                                         │
//! │  Console command (production create)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  pincorp-store (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │     Store     │    │  Repositories │    │   Snapshot   │    │    │
//! │  │   │  (store.rs)   │    │ (repository/) │    │ (snapshot.rs)│    │    │
//! │  │   │               │    │               │    │              │    │    │
//! │  │   │ Arc<Mutex<..>>│◄───│ MaterialRepo  │    │ load / save  │    │    │
//! │  │   │ transaction() │    │ ProductionRepo│    │ versioned    │    │    │
//! │  │   │ read()        │    │ SaleRepo ...  │    │ JSON         │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     Snapshot file                               │    │
//! │  │   ~/.local/share/pincorp/pincorp.json                           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The store handle, its configuration and transactions
//! - [`snapshot`] - Versioned JSON persistence
//! - [`error`] - Store error types
//! - [`repository`] - One repository per collection
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pincorp_store::{Store, StoreConfig};
//!
//! # fn main() -> Result<(), pincorp_store::StoreError> {
//! let store = Store::open(StoreConfig::new("data/pincorp.json"))?;
//!
//! let batteries = store.boms().list("battery")?;
//! let materials = store.materials().page("", 1, 10)?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;
pub mod snapshot;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use store::{Collections, Store, StoreConfig};

// Repository re-exports for convenience
pub use repository::bom::BomRepository;
pub use repository::customer::CustomerRepository;
pub use repository::material::{MaterialInput, MaterialRepository};
pub use repository::product::ProductRepository;
pub use repository::production::ProductionRepository;
pub use repository::sale::SaleRepository;
