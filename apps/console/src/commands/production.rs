//! # Production Commands
//!
//! The two lifecycle entry points, `create_order` and `set_order_status`,
//! plus listing and the pre-save plan.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Production Order Lifecycle                           │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────────┐     ┌────────────┐                   │
//! │  │ Pending  │────►│  InProgress  │────►│ Completed  │                   │
//! │  └────┬─────┘     └──────┬───────┘     └────────────┘                   │
//! │       │                  │                                              │
//! │       │   (confirmed)    │                                              │
//! │       └────────┬─────────┘                                              │
//! │                ▼                                                        │
//! │          ┌────────────┐                                                 │
//! │          │ Cancelled  │  materials returned                             │
//! │          └────────────┘                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use pincorp_core::costing::{self, CostEstimate};
use pincorp_core::production::OrderRequest;
use pincorp_core::search::Page;
use pincorp_core::{CoreError, Money, OrderStatus, ProductionOrder};
use pincorp_store::Store;
use serde::Serialize;
use tracing::debug;

use super::rejected;
use crate::error::ApiError;
use crate::state::ConfigState;

/// What an order would cost, before it is saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlanResponse {
    pub estimate: CostEstimate,
    pub additional_costs_total: Money,
    pub total_cost: Money,
    /// totalCost / quantityProduced.
    pub unit_cost: Money,
}

/// Lists orders, newest first.
pub fn list_orders(
    store: &Store,
    config: &ConfigState,
    page: usize,
) -> Result<Page<ProductionOrder>, ApiError> {
    debug!(page, "list_orders command");
    store
        .production()
        .page(page, config.page_size)
        .map_err(rejected("list_orders"))
}

/// Runs every check `create_order` would, without saving.
pub fn plan_order(store: &Store, request: &OrderRequest) -> Result<OrderPlanResponse, ApiError> {
    debug!(bom = %request.bom_id, quantity = request.quantity_produced, "plan_order command");
    let estimate = store
        .production()
        .plan(request)
        .map_err(rejected("plan_order"))?;

    let additional_costs_total = costing::additional_total(&request.additional_costs);
    let total_cost = costing::total_cost(estimate.materials_cost, &request.additional_costs)
        .map_err(CoreError::from)
        .map_err(rejected("plan_order"))?;
    Ok(OrderPlanResponse {
        unit_cost: total_cost.per_unit(request.quantity_produced),
        estimate,
        additional_costs_total,
        total_cost,
    })
}

/// Creates a Pending order.
pub fn create_order(store: &Store, request: OrderRequest) -> Result<ProductionOrder, ApiError> {
    debug!(bom = %request.bom_id, quantity = request.quantity_produced, "create_order command");
    store
        .production()
        .create_order(request)
        .map_err(rejected("create_order"))
}

/// Moves an order to a new status. Cancelling needs `confirmed`.
pub fn set_order_status(
    store: &Store,
    id: &str,
    status: OrderStatus,
    confirmed: bool,
) -> Result<ProductionOrder, ApiError> {
    debug!(id = %id, status = %status, confirmed, "set_order_status command");
    store
        .production()
        .set_status(id, status, confirmed)
        .map_err(rejected("set_order_status"))
}
