//! # Production Cost Engine
//!
//! Expands a BOM × quantity into required-material lines, checks them
//! against the material catalog and rolls up the cost of a production order.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Bom "Battery-12V"            Material catalog                          │
//! │  ├── Plate  × 2               Plate   stock 10  price  5 000            │
//! │  └── Casing × 1               Casing  stock  3  price 20 000            │
//! │           │                                                             │
//! │           ▼  estimate(bom, 3, catalog)                                  │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │ Plate   required 6   stock 10   ✓                                │   │
//! │  │ Casing  required 3   stock  3   ✓  (exactly at the boundary)     │   │
//! │  │ materialsCost = 5 000 × 6 + 20 000 × 3 = 90 000                  │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │           │                                                             │
//! │           ▼  CostSheet (labour, electricity, ...)                       │
//! │  totalCost = materialsCost + Σ additional                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! Line costs are summed as exact decimals and the order's materials cost
//! is rounded once. Integer quantities therefore give exact, linear costs.
//!
//! ## Overflow
//! Decimal products that leave the representable range saturate, and the
//! materials cost then saturates too. [`CostEstimate::ensure_within_limit`]
//! and [`total_cost`] turn such results into a validation error.
//!
//! ## Dangling references
//! A BOM line whose material was deleted never fails the computation: it
//! is reported with zero stock, zero price and `isSufficient = false`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, Shortage, ValidationError};
use crate::money::Money;
use crate::types::{AdditionalCost, Bom, Material, Unit};
use crate::validation::{validate_additional_cost, validate_amount, ValidationResult};
use crate::MAX_AMOUNT;

/// Name shown for a BOM line whose material no longer exists.
pub const UNRESOLVED_MATERIAL_NAME: &str = "Không tìm thấy";

// =============================================================================
// Required Materials
// =============================================================================

/// One BOM line scaled to the requested output.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RequiredMaterial {
    pub material_id: String,
    pub name: String,
    pub unit: Option<Unit>,
    /// bomQuantity × requested quantity.
    #[ts(as = "String")]
    pub required: Decimal,
    #[ts(as = "String")]
    pub current_stock: Decimal,
    pub is_sufficient: bool,
    pub unit_purchase_price: Money,
    /// Rounded line cost, for display.
    pub line_cost: Money,
    /// False when the material id no longer resolves.
    pub resolved: bool,
}

/// Result of expanding a BOM for a requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    #[ts(as = "String")]
    pub quantity: Decimal,
    pub lines: Vec<RequiredMaterial>,
    pub materials_cost: Money,
    /// AND over every line's `is_sufficient`.
    pub is_stock_sufficient: bool,
}

impl CostEstimate {
    /// Lines that need more than is in stock.
    pub fn shortages(&self) -> Vec<Shortage> {
        self.lines
            .iter()
            .filter(|line| !line.is_sufficient)
            .map(|line| Shortage {
                material_id: line.material_id.clone(),
                name: line.name.clone(),
                required: line.required,
                available: line.current_stock,
            })
            .collect()
    }

    /// Fails with every shortage when stock does not cover the estimate.
    pub fn ensure_sufficient(&self) -> CoreResult<()> {
        if self.is_stock_sufficient {
            Ok(())
        } else {
            Err(CoreError::InsufficientMaterials {
                shortages: self.shortages(),
            })
        }
    }

    /// Fails when the materials cost is above [`MAX_AMOUNT`].
    pub fn ensure_within_limit(&self) -> ValidationResult<()> {
        validate_amount("materialsCost", self.materials_cost)
    }
}

/// Expands `bom` × `quantity` against the material catalog.
///
/// Advisory only: nothing is reserved. Call again whenever the BOM, the
/// quantity or the catalog changes.
pub fn estimate(bom: &Bom, quantity: Decimal, materials: &[Material]) -> CostEstimate {
    let catalog: HashMap<&str, &Material> =
        materials.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut exact_cost = Decimal::ZERO;
    let lines: Vec<RequiredMaterial> = bom
        .materials
        .iter()
        .map(|line| {
            let required = line.quantity.checked_mul(quantity).unwrap_or(Decimal::MAX);
            match catalog.get(line.material_id.as_str()) {
                Some(material) => {
                    let cost = material
                        .purchase_price
                        .to_decimal()
                        .checked_mul(required)
                        .unwrap_or(Decimal::MAX);
                    exact_cost = exact_cost.checked_add(cost).unwrap_or(Decimal::MAX);
                    RequiredMaterial {
                        material_id: material.id.clone(),
                        name: material.name.clone(),
                        unit: Some(material.unit),
                        required,
                        current_stock: material.stock,
                        is_sufficient: material.stock >= required,
                        unit_purchase_price: material.purchase_price,
                        line_cost: Money::from_decimal_rounded(cost),
                        resolved: true,
                    }
                }
                None => RequiredMaterial {
                    material_id: line.material_id.clone(),
                    name: UNRESOLVED_MATERIAL_NAME.to_string(),
                    unit: None,
                    required,
                    current_stock: Decimal::ZERO,
                    is_sufficient: false,
                    unit_purchase_price: Money::zero(),
                    line_cost: Money::zero(),
                    resolved: false,
                },
            }
        })
        .collect();

    CostEstimate {
        quantity,
        is_stock_sufficient: lines.iter().all(|line| line.is_sufficient),
        materials_cost: Money::from_decimal_rounded(exact_cost),
        lines,
    }
}

/// Estimated material cost of one unit of output.
///
/// Lines whose material no longer resolves contribute nothing.
pub fn bom_unit_cost(bom: &Bom, materials: &[Material]) -> Money {
    estimate(bom, Decimal::ONE, materials).materials_cost
}

// =============================================================================
// Additional Costs
// =============================================================================

/// Σ amount over the additional costs.
pub fn additional_total(costs: &[AdditionalCost]) -> Money {
    costs.iter().map(|c| c.amount).sum()
}

/// materialsCost + Σ additional costs.
///
/// Fails when the sum is above [`MAX_AMOUNT`].
pub fn total_cost(materials_cost: Money, costs: &[AdditionalCost]) -> ValidationResult<Money> {
    let total = materials_cost
        .checked_add(additional_total(costs))
        .ok_or_else(|| ValidationError::exceeds_limit("totalCost", Money::from_minor(MAX_AMOUNT)))?;
    validate_amount("totalCost", total)?;
    Ok(total)
}

/// The additional costs being assembled for an order before it is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSheet {
    additional_costs: Vec<AdditionalCost>,
}

impl CostSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry after validating description and amount.
    pub fn add(&mut self, description: &str, amount: Money) -> CoreResult<()> {
        let cost = AdditionalCost {
            description: description.trim().to_string(),
            amount,
        };
        validate_additional_cost(&cost)?;
        self.additional_costs.push(cost);
        Ok(())
    }

    /// Removes the entry at `index`, if any.
    pub fn remove(&mut self, index: usize) -> Option<AdditionalCost> {
        if index < self.additional_costs.len() {
            Some(self.additional_costs.remove(index))
        } else {
            None
        }
    }

    pub fn entries(&self) -> &[AdditionalCost] {
        &self.additional_costs
    }

    pub fn additional_total(&self) -> Money {
        additional_total(&self.additional_costs)
    }

    pub fn total_cost(&self, materials_cost: Money) -> ValidationResult<Money> {
        total_cost(materials_cost, &self.additional_costs)
    }

    pub fn into_entries(self) -> Vec<AdditionalCost> {
        self.additional_costs
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BomMaterial;

    fn material(id: &str, name: &str, price: i64, stock: i64) -> Material {
        Material {
            id: id.to_string(),
            name: name.to_string(),
            sku: id.to_uppercase(),
            unit: Unit::Piece,
            purchase_price: Money::from_minor(price),
            stock: Decimal::from(stock),
            supplier: None,
            description: None,
        }
    }

    fn battery_bom() -> Bom {
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
        vec![
            material("plate", "Plate", 5_000, 10),
            material("casing", "Casing", 20_000, 3),
        ]
    }

    #[test]
    fn test_quantity_three_is_sufficient_at_boundary() {
        let estimate = estimate(&battery_bom(), Decimal::from(3), &catalog());

        assert_eq!(estimate.lines[0].required, Decimal::from(6));
        assert!(estimate.lines[0].is_sufficient);
        assert_eq!(estimate.lines[1].required, Decimal::from(3));
        assert!(estimate.lines[1].is_sufficient);
        assert!(estimate.is_stock_sufficient);
        assert_eq!(estimate.materials_cost.minor(), 90_000);
        assert!(estimate.ensure_sufficient().is_ok());
    }

    #[test]
    fn test_quantity_four_is_blocked() {
        let estimate = estimate(&battery_bom(), Decimal::from(4), &catalog());

        assert!(!estimate.is_stock_sufficient);
        let shortages = estimate.shortages();
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].name, "Casing");
        assert_eq!(shortages[0].required, Decimal::from(4));
        assert_eq!(shortages[0].available, Decimal::from(3));
        assert!(matches!(
            estimate.ensure_sufficient(),
            Err(CoreError::InsufficientMaterials { .. })
        ));
    }

    #[test]
    fn test_materials_cost_is_linear_in_quantity() {
        let bom = battery_bom();
        let materials = catalog();
        let unit = estimate(&bom, Decimal::ONE, &materials).materials_cost;

        for q in 1..=50i64 {
            let cost = estimate(&bom, Decimal::from(q), &materials).materials_cost;
            assert_eq!(cost, unit * q, "quantity {q}");
        }
    }

    #[test]
    fn test_sufficiency_is_monotonic() {
        let bom = battery_bom();
        let materials = catalog();
        let mut seen_insufficient = false;

        for q in 1..=20i64 {
            let sufficient = estimate(&bom, Decimal::from(q), &materials).is_stock_sufficient;
            if seen_insufficient {
                assert!(!sufficient, "quantity {q} became sufficient again");
            }
            seen_insufficient |= !sufficient;
        }
        assert!(seen_insufficient);
    }

    #[test]
    fn test_sufficiency_iff_some_line_exceeds_stock() {
        let bom = battery_bom();
        let materials = catalog();
        for q in 1..=8i64 {
            let estimate = estimate(&bom, Decimal::from(q), &materials);
            let any_short = estimate.lines.iter().any(|l| l.required > l.current_stock);
            assert_eq!(estimate.is_stock_sufficient, !any_short);
        }
    }

    #[test]
    fn test_dangling_material_degrades_gracefully() {
        let materials = vec![material("plate", "Plate", 5_000, 10)];
        let estimate = estimate(&battery_bom(), Decimal::ONE, &materials);

        let dangling = &estimate.lines[1];
        assert!(!dangling.resolved);
        assert_eq!(dangling.name, UNRESOLVED_MATERIAL_NAME);
        assert_eq!(dangling.current_stock, Decimal::ZERO);
        assert!(!dangling.is_sufficient);
        assert!(!estimate.is_stock_sufficient);
        assert_eq!(estimate.materials_cost.minor(), 10_000);
    }

    #[test]
    fn test_fractional_quantities_round_once() {
        let mut wire = material("wire", "Wire", 3_333, 100);
        wire.unit = Unit::Meter;
        let bom = Bom {
            materials: vec![BomMaterial {
                material_id: "wire".to_string(),
                quantity: Decimal::new(5, 1),
            }],
            ..battery_bom()
        };

        // 3 333 × 0.5 × 3 = 4 999.5 → 5 000, not 3 × 1 667
        let estimate = estimate(&bom, Decimal::from(3), &[wire]);
        assert_eq!(estimate.lines[0].required, Decimal::new(15, 1));
        assert_eq!(estimate.materials_cost.minor(), 5_000);
    }

    #[test]
    fn test_bom_unit_cost() {
        assert_eq!(bom_unit_cost(&battery_bom(), &catalog()).minor(), 30_000);
        assert!(bom_unit_cost(&battery_bom(), &[]).is_zero());
    }

    #[test]
    fn test_cost_sheet() {
        let mut sheet = CostSheet::new();
        sheet.add("Labour", Money::from_minor(50_000)).unwrap();
        sheet.add("Electricity", Money::from_minor(7_000)).unwrap();

        assert!(sheet.add("  ", Money::from_minor(1_000)).is_err());
        assert!(sheet.add("Packaging", Money::zero()).is_err());
        assert_eq!(sheet.entries().len(), 2);

        assert_eq!(sheet.additional_total().minor(), 57_000);
        assert_eq!(sheet.total_cost(Money::from_minor(90_000)).unwrap().minor(), 147_000);

        let removed = sheet.remove(0).unwrap();
        assert_eq!(removed.description, "Labour");
        assert!(sheet.remove(5).is_none());
        assert_eq!(sheet.total_cost(Money::from_minor(90_000)).unwrap().minor(), 97_000);
    }

    #[test]
    fn test_total_cost_is_exact() {
        let costs: Vec<AdditionalCost> = (1..=10)
            .map(|i| AdditionalCost {
                description: format!("cost {i}"),
                amount: Money::from_minor(i * 1_001),
            })
            .collect();
        let materials_cost = Money::from_minor(123_457);
        let expected = 123_457 + (1..=10).map(|i| i * 1_001).sum::<i64>();
        assert_eq!(total_cost(materials_cost, &costs).unwrap().minor(), expected);
    }

    #[test]
    fn test_total_cost_above_ceiling_is_rejected() {
        let costs = vec![AdditionalCost {
            description: "Labour".to_string(),
            amount: Money::from_minor(1),
        }];
        assert!(total_cost(Money::from_minor(MAX_AMOUNT - 1), &costs).is_ok());
        assert!(matches!(
            total_cost(Money::from_minor(MAX_AMOUNT), &costs),
            Err(ValidationError::ExceedsLimit { .. })
        ));
        assert!(total_cost(Money::from_minor(i64::MAX), &costs).is_err());
    }

    #[test]
    fn test_huge_quantities_saturate_instead_of_panicking() {
        let mut plate = material("plate", "Plate", 5_000, 10);
        plate.purchase_price = Money::from_minor(MAX_AMOUNT);
        let bom = Bom {
            materials: vec![BomMaterial {
                material_id: "plate".to_string(),
                quantity: Decimal::MAX,
            }],
            ..battery_bom()
        };

        let estimate = estimate(&bom, Decimal::from(i64::MAX), &[plate]);
        assert_eq!(estimate.lines[0].required, Decimal::MAX);
        assert!(!estimate.is_stock_sufficient);
        assert_eq!(estimate.materials_cost.minor(), i64::MAX);
        assert!(estimate.ensure_within_limit().is_err());
    }
}
