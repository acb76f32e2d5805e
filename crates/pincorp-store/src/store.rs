//! # Store Handle
//!
//! The single owner of every entity collection.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Single-Writer State Owner                          │
//! │                                                                         │
//! │  Console startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreConfig::new(path) ← snapshot path, autosave, consumption policy   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config) ← load snapshot (empty if absent)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │       Arc<Mutex<Collections>>           │                            │
//! │  │  materials boms products customers      │                            │
//! │  │  orders sales                           │                            │
//! │  └─────────────────────────────────────────┘                            │
//! │       │                                                                 │
//! │       │ transaction(|c| ...)                                            │
//! │       ▼                                                                 │
//! │  lock ──► clone ──► mutate copy ──► Ok? ──► save snapshot ──► commit    │
//! │                                      │                                  │
//! │                                      └─ Err ──► discard copy            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checking stock and moving it therefore happen under one lock and are
//! visible to nobody until they have both succeeded.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use pincorp_core::production::ConsumptionPolicy;
use pincorp_core::{Bom, Customer, Material, Product, ProductionOrder, Sale};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repository::bom::BomRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::material::MaterialRepository;
use crate::repository::product::ProductRepository;
use crate::repository::production::ProductionRepository;
use crate::repository::sale::SaleRepository;
use crate::snapshot;

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust
/// use pincorp_core::production::ConsumptionPolicy;
/// use pincorp_store::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/pincorp.json")
///     .autosave(false)
///     .consumption(ConsumptionPolicy::OnComplete);
/// assert!(!config.autosave);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Snapshot file. `None` keeps everything in memory.
    pub snapshot_path: Option<PathBuf>,

    /// Whether each committed mutation rewrites the snapshot.
    /// Default: true
    pub autosave: bool,

    /// When production orders take materials out of stock.
    /// Default: on create
    pub consumption: ConsumptionPolicy,
}

impl StoreConfig {
    /// Creates a configuration backed by a snapshot file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            snapshot_path: Some(path.into()),
            autosave: true,
            consumption: ConsumptionPolicy::default(),
        }
    }

    /// Sets whether mutations autosave.
    pub fn autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Sets the material consumption policy.
    pub fn consumption(mut self, policy: ConsumptionPolicy) -> Self {
        self.consumption = policy;
        self
    }

    /// Creates an in-memory configuration (for testing).
    ///
    /// ## Usage
    /// ```rust
    /// use pincorp_store::{Store, StoreConfig};
    ///
    /// let store = Store::open(StoreConfig::in_memory()).unwrap();
    /// assert!(store.materials().list("").unwrap().is_empty());
    /// ```
    pub fn in_memory() -> Self {
        StoreConfig {
            snapshot_path: None,
            autosave: false,
            consumption: ConsumptionPolicy::default(),
        }
    }
}

// =============================================================================
// Collections
// =============================================================================

/// Every entity the workshop keeps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collections {
    pub materials: Vec<Material>,
    pub boms: Vec<Bom>,
    pub products: Vec<Product>,
    pub customers: Vec<Customer>,
    pub orders: Vec<ProductionOrder>,
    pub sales: Vec<Sale>,
}

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cloning is cheap and every clone sees the same collections.
#[derive(Debug, Clone)]
pub struct Store {
    state: Arc<Mutex<Collections>>,
    config: Arc<StoreConfig>,
}

impl Store {
    /// Opens the store, loading the snapshot if one exists.
    ///
    /// ## Returns
    /// * `Ok(Store)` - Ready-to-use handle
    /// * `Err(StoreError)` - Snapshot unreadable or of an unknown version
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let collections = match &config.snapshot_path {
            Some(path) => {
                info!(path = %path.display(), "Opening store");
                snapshot::load(path)?
            }
            None => {
                info!("Opening in-memory store");
                Collections::default()
            }
        };

        debug!(
            materials = collections.materials.len(),
            boms = collections.boms.len(),
            products = collections.products.len(),
            orders = collections.orders.len(),
            sales = collections.sales.len(),
            "Store loaded"
        );

        Ok(Store::with_collections(config, collections))
    }

    /// Creates a store over existing collections, without touching disk.
    pub fn with_collections(config: StoreConfig, collections: Collections) -> Self {
        Store {
            state: Arc::new(Mutex::new(collections)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Collections>> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Runs `f` with read access to the collections.
    pub fn read<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&Collections) -> R,
    {
        let state = self.lock()?;
        Ok(f(&state))
    }

    /// Runs `f` against a working copy and commits it only if `f` succeeds.
    ///
    /// With autosave on, the snapshot is written before committing, so a
    /// failed write also leaves the in-memory state untouched.
    pub fn transaction<F, R>(&self, f: F) -> StoreResult<R>
    where
        F: FnOnce(&mut Collections) -> StoreResult<R>,
    {
        let mut state = self.lock()?;
        let mut working = state.clone();
        let result = f(&mut working)?;

        if self.config.autosave {
            if let Some(path) = &self.config.snapshot_path {
                snapshot::save(path, &working)?;
            }
        }

        *state = working;
        Ok(result)
    }

    /// Writes the snapshot now, whatever the autosave setting.
    pub fn save(&self) -> StoreResult<()> {
        let Some(path) = &self.config.snapshot_path else {
            return Ok(());
        };
        let state = self.lock()?;
        snapshot::save(path, &state)
    }

    /// Returns a copy of every collection.
    pub fn export(&self) -> StoreResult<Collections> {
        self.read(Collections::clone)
    }

    pub fn materials(&self) -> MaterialRepository {
        MaterialRepository::new(self.clone())
    }

    pub fn boms(&self) -> BomRepository {
        BomRepository::new(self.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.clone())
    }

    pub fn production(&self) -> ProductionRepository {
        ProductionRepository::new(self.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.clone())
    }
}

/// Fresh collision-resistant id for a new entity.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
