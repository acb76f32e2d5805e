//! # Production Order Lifecycle
//!
//! Creation of production orders and the status state machine, together
//! with the stock movements each step implies.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create ──► Pending ──────► InProgress ──────► Completed                │
//! │     │          │                 │                 │                    │
//! │     │          │                 │                 └─ product stock +=  │
//! │     │          │                 │                    qty, costPrice =  │
//! │     │          │                 │                    totalCost / qty   │
//! │     │          └────────┬────────┘                                      │
//! │     │                   ▼                                               │
//! │     │              Cancelled ── materials consumed so far are returned  │
//! │     │                                                                   │
//! │     └─ sufficiency gate (+ reserve-and-commit under OnCreate)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//! Checking stock and decrementing it happen in one call,
//! [`MaterialStock::reserve_and_commit`]: either every line is taken or
//! nothing is. Completed and Cancelled are terminal.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::costing::{estimate, total_cost, CostEstimate, UNRESOLVED_MATERIAL_NAME};
use crate::error::{CoreError, CoreResult, Shortage};
use crate::money::Money;
use crate::types::{
    AdditionalCost, Bom, Material, MaterialConsumption, OrderStatus, Product, ProductionOrder,
};
use crate::validation::{validate_additional_cost, validate_production_quantity};

// =============================================================================
// Consumption Policy
// =============================================================================

/// When an order takes its materials out of stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionPolicy {
    /// Gate and decrement together when the order is created.
    #[default]
    OnCreate,
    /// Creation only gates; completion takes the stock.
    OnComplete,
}

impl fmt::Display for ConsumptionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumptionPolicy::OnCreate => f.write_str("on_create"),
            ConsumptionPolicy::OnComplete => f.write_str("on_complete"),
        }
    }
}

impl FromStr for ConsumptionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "on_create" | "create" => Ok(ConsumptionPolicy::OnCreate),
            "on_complete" | "complete" => Ok(ConsumptionPolicy::OnComplete),
            other => Err(format!("unknown consumption policy '{other}'")),
        }
    }
}

// =============================================================================
// Material Stock
// =============================================================================

/// The single place material stock is checked and moved.
pub trait MaterialStock {
    /// Takes every line out of stock, or nothing at all.
    ///
    /// Fails with [`CoreError::InsufficientMaterials`] listing each line
    /// that cannot be covered.
    fn reserve_and_commit(&mut self, lines: &[MaterialConsumption]) -> CoreResult<()>;

    /// Returns previously consumed lines to stock.
    ///
    /// Returns the ids of materials that no longer exist and could not be
    /// credited.
    fn release(&mut self, lines: &[MaterialConsumption]) -> Vec<String>;
}

/// Sums lines per material, keeping first-seen order.
fn merge_lines(lines: &[MaterialConsumption]) -> Vec<(&str, Decimal)> {
    let mut merged: Vec<(&str, Decimal)> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|(id, _)| *id == line.material_id) {
            Some((_, quantity)) => *quantity += line.quantity,
            None => merged.push((line.material_id.as_str(), line.quantity)),
        }
    }
    merged
}

impl MaterialStock for Vec<Material> {
    fn reserve_and_commit(&mut self, lines: &[MaterialConsumption]) -> CoreResult<()> {
        let needs = merge_lines(lines);
        let index: HashMap<&str, usize> = self
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.as_str(), i))
            .collect();

        let mut shortages = Vec::new();
        let mut moves = Vec::with_capacity(needs.len());
        for (id, required) in needs {
            match index.get(id) {
                Some(&i) if self[i].stock >= required => moves.push((i, required)),
                Some(&i) => shortages.push(Shortage {
                    material_id: id.to_string(),
                    name: self[i].name.clone(),
                    required,
                    available: self[i].stock,
                }),
                None => shortages.push(Shortage {
                    material_id: id.to_string(),
                    name: UNRESOLVED_MATERIAL_NAME.to_string(),
                    required,
                    available: Decimal::ZERO,
                }),
            }
        }

        if !shortages.is_empty() {
            return Err(CoreError::InsufficientMaterials { shortages });
        }

        for (i, required) in moves {
            self[i].stock -= required;
        }
        Ok(())
    }

    fn release(&mut self, lines: &[MaterialConsumption]) -> Vec<String> {
        let mut missing = Vec::new();
        for (id, quantity) in merge_lines(lines) {
            match self.iter_mut().find(|m| m.id == id) {
                Some(material) => material.stock += quantity,
                None => missing.push(id.to_string()),
            }
        }
        missing
    }
}

// =============================================================================
// Order Creation
// =============================================================================

/// What the operator submits to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub bom_id: String,
    pub quantity_produced: i64,
    pub additional_costs: Vec<AdditionalCost>,
    pub notes: Option<String>,
    pub user_name: Option<String>,
}

/// Material lines an estimate needs taken out of stock.
pub fn requirements(estimate: &CostEstimate) -> Vec<MaterialConsumption> {
    estimate
        .lines
        .iter()
        .map(|line| MaterialConsumption {
            material_id: line.material_id.clone(),
            quantity: line.required,
        })
        .collect()
}

/// Validates a request and runs the sufficiency gate.
///
/// This is the only hard stock check before an order exists. Quantities
/// and amounts are bounded, and a materials or total cost above
/// [`MAX_AMOUNT`](crate::MAX_AMOUNT) is rejected here rather than stored.
pub fn plan_order(
    request: &OrderRequest,
    bom: &Bom,
    materials: &[Material],
) -> CoreResult<CostEstimate> {
    validate_production_quantity(request.quantity_produced)?;
    for cost in &request.additional_costs {
        validate_additional_cost(cost)?;
    }

    let estimate = estimate(bom, Decimal::from(request.quantity_produced), materials);
    estimate.ensure_sufficient()?;
    estimate.ensure_within_limit()?;
    total_cost(estimate.materials_cost, &request.additional_costs)?;
    Ok(estimate)
}

/// Builds a Pending order from a planned request.
///
/// Product name and SKU are copied from the BOM so later BOM edits or
/// deletion never alter the order.
pub fn new_order(
    id: String,
    creation_date: DateTime<Utc>,
    request: OrderRequest,
    bom: &Bom,
    estimate: &CostEstimate,
) -> CoreResult<ProductionOrder> {
    let total_cost = total_cost(estimate.materials_cost, &request.additional_costs)?;
    Ok(ProductionOrder {
        id,
        creation_date,
        bom_id: bom.id.clone(),
        product_name: bom.product_name.clone(),
        product_sku: bom.product_sku.clone(),
        quantity_produced: request.quantity_produced,
        status: OrderStatus::Pending,
        materials_cost: estimate.materials_cost,
        additional_costs: request.additional_costs,
        total_cost,
        notes: request.notes,
        user_name: request.user_name,
        required_materials: requirements(estimate),
        consumed: Vec::new(),
    })
}

// =============================================================================
// Status Transitions
// =============================================================================

/// Finished goods delivered by a completed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductReceipt {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub unit_cost: Money,
}

impl ProductReceipt {
    /// Adds the goods to the product catalog.
    ///
    /// Stock grows by `quantity` and `costPrice` becomes `unit_cost`. A
    /// missing product is created with a selling price of zero; an
    /// existing selling price is never touched.
    pub fn apply_to(&self, products: &mut Vec<Product>) {
        match products.iter_mut().find(|p| p.id == self.product_id) {
            Some(product) => {
                product.stock += self.quantity;
                product.cost_price = self.unit_cost;
            }
            None => products.push(Product {
                id: self.product_id.clone(),
                name: self.name.clone(),
                sku: self.sku.clone(),
                stock: self.quantity,
                cost_price: self.unit_cost,
                selling_price: Money::zero(),
            }),
        }
    }
}

/// Every side effect of one status change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub from: OrderStatus,
    pub to: OrderStatus,
    /// Material still to be taken out of stock.
    pub consume: Vec<MaterialConsumption>,
    /// Material to give back.
    pub release: Vec<MaterialConsumption>,
    pub receipt: Option<ProductReceipt>,
}

/// Works out what moving `order` to `to` requires.
///
/// Completion consumes whatever the order has not consumed yet, so an
/// order created under [`ConsumptionPolicy::OnComplete`] takes its
/// materials here. Cancellation returns exactly what was consumed.
pub fn plan_transition(order: &ProductionOrder, to: OrderStatus) -> CoreResult<TransitionPlan> {
    if !order.status.can_transition_to(to) {
        return Err(CoreError::InvalidTransition {
            order_id: order.id.clone(),
            from: order.status,
            to,
        });
    }

    let mut plan = TransitionPlan {
        from: order.status,
        to,
        consume: Vec::new(),
        release: Vec::new(),
        receipt: None,
    };

    match to {
        OrderStatus::Completed => {
            if order.consumed.is_empty() {
                plan.consume = order.required_materials.clone();
            }
            plan.receipt = Some(ProductReceipt {
                product_id: order.bom_id.clone(),
                name: order.product_name.clone(),
                sku: order.product_sku.clone(),
                quantity: order.quantity_produced,
                unit_cost: order.unit_cost(),
            });
        }
        OrderStatus::Cancelled => plan.release = order.consumed.clone(),
        OrderStatus::Pending | OrderStatus::InProgress => {}
    }

    Ok(plan)
}

impl ProductionOrder {
    /// Records a transition whose stock effects have been applied.
    pub fn apply(&mut self, plan: &TransitionPlan) {
        self.status = plan.to;
        self.consumed.extend(plan.consume.iter().cloned());
        if plan.to == OrderStatus::Cancelled {
            self.consumed.clear();
        }
    }
}

/// Runs a transition against the catalogs, all or nothing.
///
/// Returns the ids of materials that could not be credited back on
/// cancellation because they were deleted.
pub fn transition<S: MaterialStock>(
    order: &mut ProductionOrder,
    to: OrderStatus,
    materials: &mut S,
    products: &mut Vec<Product>,
) -> CoreResult<Vec<String>> {
    let plan = plan_transition(order, to)?;

    if !plan.consume.is_empty() {
        materials.reserve_and_commit(&plan.consume)?;
    }
    let missing = materials.release(&plan.release);
    if let Some(receipt) = &plan.receipt {
        receipt.apply_to(products);
    }

    order.apply(&plan);
    Ok(missing)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::{BomMaterial, Unit};

    fn material(id: &str, price: i64, stock: i64) -> Material {
        Material {
            id: id.to_string(),
            name: id.to_string(),
            sku: id.to_uppercase(),
            unit: Unit::Piece,
            purchase_price: Money::from_minor(price),
            stock: Decimal::from(stock),
            supplier: None,
            description: None,
        }
    }

    fn bom() -> Bom {
        Bom {
            id: "bom-12v".to_string(),
            product_name: "Battery-12V".to_string(),
            product_sku: "PIN-12V".to_string(),
            materials: vec![
                BomMaterial {
                    material_id: "plate".to_string(),
                    quantity: Decimal::from(2),
                },
                BomMaterial {
                    material_id: "casing".to_string(),
                    quantity: Decimal::ONE,
                },
            ],
            notes: None,
        }
    }

    fn catalog() -> Vec<Material> {
        vec![material("plate", 5_000, 10), material("casing", 20_000, 3)]
    }

    fn request(quantity: i64) -> OrderRequest {
        OrderRequest {
            bom_id: "bom-12v".to_string(),
            quantity_produced: quantity,
            additional_costs: vec![AdditionalCost {
                description: "Labour".to_string(),
                amount: Money::from_minor(30_000),
            }],
            notes: None,
            user_name: Some("Lan".to_string()),
        }
    }

    fn order(quantity: i64, materials: &[Material]) -> ProductionOrder {
        let req = request(quantity);
        let estimate = plan_order(&req, &bom(), materials).unwrap();
        new_order("po-1".to_string(), Utc::now(), req, &bom(), &estimate).unwrap()
    }

    #[test]
    fn test_new_order_snapshots_bom_and_costs() {
        let order = order(3, &catalog());

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.product_name, "Battery-12V");
        assert_eq!(order.product_sku, "PIN-12V");
        assert_eq!(order.materials_cost.minor(), 90_000);
        assert_eq!(order.total_cost.minor(), 120_000);
        assert_eq!(order.required_materials.len(), 2);
        assert!(order.consumed.is_empty());
    }

    #[test]
    fn test_plan_order_gates_on_stock_and_input() {
        let materials = catalog();
        assert!(matches!(
            plan_order(&request(4), &bom(), &materials),
            Err(CoreError::InsufficientMaterials { .. })
        ));
        assert!(matches!(
            plan_order(&request(0), &bom(), &materials),
            Err(CoreError::Validation(_))
        ));

        let mut bad_cost = request(1);
        bad_cost.additional_costs[0].amount = Money::zero();
        assert!(plan_order(&bad_cost, &bom(), &materials).is_err());
    }

    #[test]
    fn test_plan_order_rejects_oversized_orders() {
        let mut plenty = catalog();
        for material in &mut plenty {
            material.stock = Decimal::from(i64::MAX);
        }
        assert!(matches!(
            plan_order(&request(i64::MAX), &bom(), &plenty),
            Err(CoreError::Validation(ValidationError::ExceedsLimit { .. }))
        ));

        // 2 plates at the price ceiling already exceed it.
        plenty[0].purchase_price = Money::from_minor(crate::MAX_AMOUNT);
        assert!(matches!(
            plan_order(&request(1), &bom(), &plenty),
            Err(CoreError::Validation(ValidationError::ExceedsLimit { .. }))
        ));

        let mut costly = request(1);
        costly.additional_costs[0].amount = Money::from_minor(crate::MAX_AMOUNT);
        assert!(matches!(
            plan_order(&costly, &bom(), &catalog()),
            Err(CoreError::Validation(ValidationError::ExceedsLimit { .. }))
        ));
    }

    #[test]
    fn test_reserve_and_commit_is_all_or_nothing() {
        let mut materials = catalog();
        let lines = vec![
            MaterialConsumption {
                material_id: "plate".to_string(),
                quantity: Decimal::from(8),
            },
            MaterialConsumption {
                material_id: "casing".to_string(),
                quantity: Decimal::from(4),
            },
        ];

        let err = materials.reserve_and_commit(&lines).unwrap_err();
        match err {
            CoreError::InsufficientMaterials { shortages } => {
                assert_eq!(shortages.len(), 1);
                assert_eq!(shortages[0].material_id, "casing");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(materials, catalog());

        materials.reserve_and_commit(&lines[..1]).unwrap();
        assert_eq!(materials[0].stock, Decimal::from(2));
    }

    #[test]
    fn test_reserve_merges_repeated_lines_and_flags_missing() {
        let mut materials = catalog();
        let repeated = vec![
            MaterialConsumption {
                material_id: "casing".to_string(),
                quantity: Decimal::from(2),
            },
            MaterialConsumption {
                material_id: "casing".to_string(),
                quantity: Decimal::from(2),
            },
        ];
        assert!(materials.reserve_and_commit(&repeated).is_err());

        let ghost = vec![MaterialConsumption {
            material_id: "ghost".to_string(),
            quantity: Decimal::ONE,
        }];
        assert!(materials.reserve_and_commit(&ghost).is_err());
        assert_eq!(materials, catalog());
    }

    #[test]
    fn test_release_reports_missing_materials() {
        let mut materials = catalog();
        let missing = materials.release(&[
            MaterialConsumption {
                material_id: "plate".to_string(),
                quantity: Decimal::from(6),
            },
            MaterialConsumption {
                material_id: "ghost".to_string(),
                quantity: Decimal::ONE,
            },
        ]);
        assert_eq!(materials[0].stock, Decimal::from(16));
        assert_eq!(missing, vec!["ghost".to_string()]);
    }

    #[test]
    fn test_full_lifecycle_under_on_complete() {
        let mut materials = catalog();
        let mut products = Vec::new();
        let mut order = order(3, &materials);

        transition(&mut order, OrderStatus::InProgress, &mut materials, &mut products).unwrap();
        assert_eq!(materials, catalog());

        transition(&mut order, OrderStatus::Completed, &mut materials, &mut products).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(materials[0].stock, Decimal::from(4));
        assert_eq!(materials[1].stock, Decimal::ZERO);

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "bom-12v");
        assert_eq!(products[0].stock, 3);
        assert_eq!(products[0].cost_price.minor(), 40_000);
        assert!(products[0].selling_price.is_zero());
    }

    #[test]
    fn test_cancel_returns_what_was_consumed() {
        let mut materials = catalog();
        let mut products = Vec::new();
        let mut order = order(3, &materials);

        // Consumed at creation.
        materials.reserve_and_commit(&order.required_materials).unwrap();
        order.consumed = order.required_materials.clone();

        transition(&mut order, OrderStatus::Cancelled, &mut materials, &mut products).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.consumed.is_empty());
        assert_eq!(materials, catalog());
        assert!(products.is_empty());
    }

    #[test]
    fn test_completion_does_not_consume_twice() {
        let mut materials = catalog();
        let mut products = Vec::new();
        let mut order = order(2, &materials);
        materials.reserve_and_commit(&order.required_materials).unwrap();
        order.consumed = order.required_materials.clone();
        let after_create = materials.clone();

        transition(&mut order, OrderStatus::InProgress, &mut materials, &mut products).unwrap();
        transition(&mut order, OrderStatus::Completed, &mut materials, &mut products).unwrap();
        assert_eq!(materials, after_create);
    }

    #[test]
    fn test_completion_fails_cleanly_when_stock_ran_out() {
        let mut materials = catalog();
        let mut products = Vec::new();
        let mut order = order(3, &materials);
        transition(&mut order, OrderStatus::InProgress, &mut materials, &mut products).unwrap();

        materials[1].stock = Decimal::ONE;
        let snapshot = materials.clone();
        let result = transition(&mut order, OrderStatus::Completed, &mut materials, &mut products);

        assert!(matches!(result, Err(CoreError::InsufficientMaterials { .. })));
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(materials, snapshot);
        assert!(products.is_empty());
    }

    #[test]
    fn test_terminal_states_reject_changes() {
        let mut materials = catalog();
        let mut products = Vec::new();
        let mut order = order(1, &materials);
        transition(&mut order, OrderStatus::Cancelled, &mut materials, &mut products).unwrap();

        for to in [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert!(matches!(
                plan_transition(&order, to),
                Err(CoreError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_pending_cannot_jump_to_completed() {
        let order = order(1, &catalog());
        assert!(plan_transition(&order, OrderStatus::Completed).is_err());
    }

    #[test]
    fn test_receipt_keeps_selling_price() {
        let mut products = vec![Product {
            id: "bom-12v".to_string(),
            name: "Battery-12V".to_string(),
            sku: "PIN-12V".to_string(),
            stock: 2,
            cost_price: Money::from_minor(35_000),
            selling_price: Money::from_minor(99_000),
        }];
        let receipt = ProductReceipt {
            product_id: "bom-12v".to_string(),
            name: "Battery-12V".to_string(),
            sku: "PIN-12V".to_string(),
            quantity: 3,
            unit_cost: Money::from_minor(40_000),
        };
        receipt.apply_to(&mut products);

        assert_eq!(products[0].stock, 5);
        assert_eq!(products[0].cost_price.minor(), 40_000);
        assert_eq!(products[0].selling_price.minor(), 99_000);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("on_complete".parse::<ConsumptionPolicy>(), Ok(ConsumptionPolicy::OnComplete));
        assert_eq!("on-create".parse::<ConsumptionPolicy>(), Ok(ConsumptionPolicy::OnCreate));
        assert!("later".parse::<ConsumptionPolicy>().is_err());
        assert_eq!(ConsumptionPolicy::default().to_string(), "on_create");
    }
}
