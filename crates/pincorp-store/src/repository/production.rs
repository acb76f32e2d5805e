//! # Production Repository
//!
//! Production orders and the two lifecycle entry points: create an order and
//! change its status.
//!
//! ## Stock Movement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Where Materials Leave and Return                        │
//! │                                                                         │
//! │  create_order ──► plan_order (gate) ──► Pending                         │
//! │                      │                                                  │
//! │                      └─ on_create: reserve_and_commit(required)         │
//! │                                                                         │
//! │  Pending ──► InProgress             no stock effect                     │
//! │                                                                         │
//! │  InProgress ──► Completed           reserve_and_commit if not consumed  │
//! │                                     product stock += qty, cost = unit   │
//! │                                                                         │
//! │  Pending/InProgress ──► Cancelled   release(consumed), needs confirm    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each entry point runs inside one store transaction, so the stock check
//! and the stock change cannot be separated by another writer.

use chrono::{DateTime, Utc};
use pincorp_core::costing::CostEstimate;
use pincorp_core::production::{self, ConsumptionPolicy, MaterialStock, OrderRequest};
use pincorp_core::search::{self, Page};
use pincorp_core::{Bom, OrderStatus, ProductionOrder};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::{new_id, Collections, Store};

/// Repository for production orders.
#[derive(Debug, Clone)]
pub struct ProductionRepository {
    store: Store,
}

fn find_bom<'a>(c: &'a Collections, bom_id: &str) -> StoreResult<&'a Bom> {
    c.boms
        .iter()
        .find(|b| b.id == bom_id)
        .ok_or_else(|| StoreError::not_found("BOM", bom_id))
}

impl ProductionRepository {
    pub fn new(store: Store) -> Self {
        ProductionRepository { store }
    }

    /// All orders, newest first.
    pub fn list(&self) -> StoreResult<Vec<ProductionOrder>> {
        self.store.read(|c| {
            let mut orders = c.orders.clone();
            orders.sort_by(|a, b| {
                b.creation_date
                    .cmp(&a.creation_date)
                    .then_with(|| a.id.cmp(&b.id))
            });
            orders
        })
    }

    pub fn page(&self, page: usize, page_size: usize) -> StoreResult<Page<ProductionOrder>> {
        Ok(search::paginate(self.list()?, page, page_size))
    }

    pub fn get(&self, id: &str) -> StoreResult<ProductionOrder> {
        self.store
            .read(|c| c.orders.iter().find(|o| o.id == id).cloned())?
            .ok_or_else(|| StoreError::not_found("Production order", id))
    }

    /// Validates a request and previews its cost without creating anything.
    ///
    /// Fails the same way [`create_order`](Self::create_order) would.
    pub fn plan(&self, request: &OrderRequest) -> StoreResult<CostEstimate> {
        self.store.read(|c| -> StoreResult<CostEstimate> {
            let bom = find_bom(c, &request.bom_id)?;
            Ok(production::plan_order(request, bom, &c.materials)?)
        })?
    }

    /// Creates a Pending order stamped now.
    pub fn create_order(&self, request: OrderRequest) -> StoreResult<ProductionOrder> {
        self.create_order_at(request, Utc::now())
    }

    /// Creates a Pending order with the given creation timestamp.
    ///
    /// ## Returns
    /// * `Ok(ProductionOrder)` - Stored order
    /// * `Err(StoreError::NotFound)` - Unknown BOM
    /// * `Err(StoreError::Core)` - Invalid input or insufficient materials
    pub fn create_order_at(
        &self,
        request: OrderRequest,
        creation_date: DateTime<Utc>,
    ) -> StoreResult<ProductionOrder> {
        let policy = self.store.config().consumption;

        self.store.transaction(|c| {
            let bom = find_bom(c, &request.bom_id)?.clone();
            let estimate = production::plan_order(&request, &bom, &c.materials)?;
            let mut order =
                production::new_order(new_id(), creation_date, request, &bom, &estimate)?;

            if policy == ConsumptionPolicy::OnCreate {
                c.materials.reserve_and_commit(&order.required_materials)?;
                order.consumed = order.required_materials.clone();
            }

            info!(
                id = %order.id,
                bom = %order.bom_id,
                quantity = order.quantity_produced,
                total_cost = %order.total_cost,
                policy = %policy,
                "Production order created"
            );
            c.orders.push(order.clone());
            Ok(order)
        })
    }

    /// Moves an order to `to`, applying its stock effects atomically.
    ///
    /// Cancelling needs `confirmed`. Materials deleted since the order
    /// consumed them cannot be credited back and are logged.
    pub fn set_status(
        &self,
        id: &str,
        to: OrderStatus,
        confirmed: bool,
    ) -> StoreResult<ProductionOrder> {
        if to == OrderStatus::Cancelled && !confirmed {
            return Err(StoreError::confirmation_required("cancel production order"));
        }

        self.store.transaction(|c| {
            let Collections {
                materials,
                products,
                orders,
                ..
            } = c;

            let order = orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| StoreError::not_found("Production order", id))?;
            let from = order.status;

            let missing = production::transition(order, to, materials, products)?;
            for material_id in &missing {
                warn!(order = %id, material = %material_id, "Material gone, stock not returned");
            }

            info!(id = %id, from = %from, to = %to, "Production order status changed");
            debug!(consumed = order.consumed.len(), "Order consumption after transition");
            Ok(order.clone())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
