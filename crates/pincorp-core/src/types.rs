//! # Domain Types
//!
//! Core domain types used throughout the workshop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalogs (long-lived, edited in place)                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │  Material    │  │     Bom      │  │   Product    │  │  Customer  │  │
//! │  │  stock (dec) │  │  materials[] │  │  stock (int) │  │  phone     │  │
//! │  │  unit        │  │  productSku  │  │  costPrice   │  │  address   │  │
//! │  │  price       │  │              │  │  sellingPrice│  │            │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  Ledgers (append-mostly, hold snapshots)                                │
//! │  ┌────────────────────┐   ┌──────────────────────┐                      │
//! │  │  ProductionOrder   │   │        Sale          │                      │
//! │  │  productName (copy)│   │  items[] (CartItem   │                      │
//! │  │  status            │   │   copies with cost)  │                      │
//! │  │  totalCost         │   │  customer (copy)     │                      │
//! │  └────────────────────┘   └──────────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Ledger records copy names, SKUs and prices at creation time. Editing a
//! catalog entry afterwards never rewrites history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Rate
// =============================================================================

/// A ratio represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 2000 bps = 20%. Signed, because a product
/// sold below cost has a negative margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(i64);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percentage())
    }
}

// =============================================================================
// Material
// =============================================================================

/// Unit a material is bought and consumed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Piece,
    Meter,
    Kg,
    Liter,
    Roll,
}

impl Unit {
    /// Label shown to shop staff.
    pub const fn label(&self) -> &'static str {
        match self {
            Unit::Piece => "cái",
            Unit::Meter => "mét",
            Unit::Kg => "kg",
            Unit::Liter => "lít",
            Unit::Roll => "cuộn",
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "piece" | "cái" => Ok(Unit::Piece),
            "meter" | "mét" => Ok(Unit::Meter),
            "kg" => Ok(Unit::Kg),
            "liter" | "lít" => Ok(Unit::Liter),
            "roll" | "cuộn" => Ok(Unit::Roll),
            other => Err(format!("unknown unit '{other}'")),
        }
    }
}

/// A purchasable raw material.
///
/// `stock` is only ever changed by production orders (and by a full
/// record edit in the catalog).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub unit: Unit,
    pub purchase_price: Money,
    #[ts(as = "String")]
    pub stock: Decimal,
    pub supplier: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Bill of Materials
// =============================================================================

/// One line of a BOM: how much of a material one unit of output needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BomMaterial {
    pub material_id: String,
    #[ts(as = "String")]
    pub quantity: Decimal,
}

/// A named recipe for one finished product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bom {
    pub id: String,
    pub product_name: String,
    pub product_sku: String,
    pub materials: Vec<BomMaterial>,
    pub notes: Option<String>,
}

impl Bom {
    /// Checks whether the BOM already has a line for `material_id`.
    pub fn contains(&self, material_id: &str) -> bool {
        self.materials.iter().any(|m| m.material_id == material_id)
    }
}

// =============================================================================
// Production Orders
// =============================================================================

/// An ad-hoc cost (labour, electricity, packaging) added to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCost {
    pub description: String,
    pub amount: Money,
}

/// Lifecycle status of a production order.
///
/// ```text
///   Pending ──► InProgress ──► Completed
///      │            │
///      └────────────┴──────► Cancelled
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Completed and Cancelled accept no further change.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `self → next` is one of the four legal transitions.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::InProgress)
                | (OrderStatus::InProgress, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::InProgress, OrderStatus::Cancelled)
        )
    }

    /// Label shown to shop staff.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Đang chờ",
            OrderStatus::InProgress => "Đang sản xuất",
            OrderStatus::Completed => "Hoàn thành",
            OrderStatus::Cancelled => "Đã hủy",
        }
    }

    const fn code(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "in_progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

/// Material actually taken out of stock for an order.
///
/// Cancelling the order returns exactly these amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaterialConsumption {
    pub material_id: String,
    #[ts(as = "String")]
    pub quantity: Decimal,
}

/// A record of converting materials into finished goods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    pub id: String,
    #[ts(as = "String")]
    pub creation_date: DateTime<Utc>,
    pub bom_id: String,
    /// Product name at time of creation (frozen).
    pub product_name: String,
    /// Product SKU at time of creation (frozen).
    pub product_sku: String,
    pub quantity_produced: i64,
    pub status: OrderStatus,
    pub materials_cost: Money,
    pub additional_costs: Vec<AdditionalCost>,
    /// materials_cost + Σ additional_costs.
    pub total_cost: Money,
    pub notes: Option<String>,
    pub user_name: Option<String>,
    /// Material needs frozen at creation (BOM × quantity).
    pub required_materials: Vec<MaterialConsumption>,
    /// Stock movements applied so far; empty until materials are consumed.
    pub consumed: Vec<MaterialConsumption>,
}

impl ProductionOrder {
    /// Cost of one produced unit.
    pub fn unit_cost(&self) -> Money {
        self.total_cost.per_unit(self.quantity_produced)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A finished good available for sale.
///
/// `cost_price` comes from production; `selling_price` is set by staff and
/// is never derived from cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Same as the id of the BOM that produces it.
    pub id: String,
    pub name: String,
    pub sku: String,
    pub stock: i64,
    pub cost_price: Money,
    pub selling_price: Money,
}

impl Product {
    /// Selling price minus cost price.
    #[inline]
    pub fn profit(&self) -> Money {
        self.selling_price - self.cost_price
    }

    /// Checks if `quantity` units can be sold from stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// A line in an in-progress sale.
/// Uses snapshot pattern to freeze product data at time of adding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub selling_price: Money,
    /// Cost at time of sale (frozen), used by the reports.
    pub cost_price: Money,
    /// Stock available when the line was created.
    pub stock: i64,
    pub discount: Option<Money>,
}

impl CartItem {
    /// Creates a line from a product with the given quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            quantity,
            selling_price: product.selling_price,
            cost_price: product.cost_price,
            stock: product.stock,
            discount: None,
        }
    }

    /// selling_price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.selling_price * self.quantity
    }

    /// cost_price × quantity.
    #[inline]
    pub fn line_cost(&self) -> Money {
        self.cost_price * self.quantity
    }
}

// =============================================================================
// Customers
// =============================================================================

/// A registered buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Customer details embedded in a sale.
///
/// `id` is `None` for a walk-in buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub id: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl CustomerSnapshot {
    /// A buyer known only by a free-text name.
    pub fn walk_in(name: impl Into<String>) -> Self {
        CustomerSnapshot {
            id: None,
            name: name.into(),
            phone: None,
            address: None,
        }
    }

    pub fn is_walk_in(&self) -> bool {
        self.id.is_none()
    }
}

impl From<&Customer> for CustomerSnapshot {
    fn from(customer: &Customer) -> Self {
        CustomerSnapshot {
            id: Some(customer.id.clone()),
            name: customer.name.clone(),
            phone: Some(customer.phone.clone()),
            address: customer.address.clone(),
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash over the counter.
    Cash,
    /// Bank transfer.
    Bank,
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "bank" | "transfer" => Ok(PaymentMethod::Bank),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

/// The staff member performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub id: String,
    pub name: String,
}

/// A sale as produced by checkout, before the register stamps
/// id, date and operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub customer: CustomerSnapshot,
    pub payment_method: PaymentMethod,
}

impl SaleDraft {
    /// Stamps the draft into a permanent ledger entry.
    pub fn into_sale(self, id: String, date: DateTime<Utc>, operator: &Operator) -> Sale {
        Sale {
            id,
            date,
            items: self.items,
            subtotal: self.subtotal,
            discount: self.discount,
            total: self.total,
            customer: self.customer,
            payment_method: self.payment_method,
            user_id: operator.id.clone(),
            user_name: operator.name.clone(),
        }
    }
}

/// A completed sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub subtotal: Money,
    pub discount: Money,
    /// subtotal − discount.
    pub total: Money,
    pub customer: CustomerSnapshot,
    pub payment_method: PaymentMethod,
    pub user_id: String,
    pub user_name: String,
}

impl Sale {
    /// Σ cost_price × quantity over the frozen lines.
    pub fn cost(&self) -> Money {
        self.items.iter().map(CartItem::line_cost).sum()
    }

    /// total − cost.
    pub fn profit(&self) -> Money {
        self.total - self.cost()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::from_bps(2_500).to_string(), "25.0%");
        assert_eq!(Rate::from_bps(-1_050).to_string(), "-10.5%");
        assert!((Rate::from_bps(825).percentage() - 8.25).abs() < 0.001);
    }

    #[test]
    fn test_order_status_transitions() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));

        assert!(!Pending.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Pending, InProgress, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_order_status_round_trips_through_text() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert_eq!("in-progress".parse::<OrderStatus>(), Ok(OrderStatus::InProgress));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn test_unit_labels_and_parsing() {
        assert_eq!(Unit::Roll.label(), "cuộn");
        assert_eq!("mét".parse::<Unit>(), Ok(Unit::Meter));
        assert_eq!("KG".parse::<Unit>(), Ok(Unit::Kg));
        assert_eq!(Unit::default(), Unit::Piece);
    }

    #[test]
    fn test_customer_snapshot() {
        let customer = Customer {
            id: "c1".to_string(),
            name: "Anh Minh".to_string(),
            phone: "0901234567".to_string(),
            address: None,
        };
        let snapshot = CustomerSnapshot::from(&customer);
        assert_eq!(snapshot.id.as_deref(), Some("c1"));
        assert!(!snapshot.is_walk_in());
        assert!(CustomerSnapshot::walk_in("Khách lẻ").is_walk_in());
    }

    #[test]
    fn test_material_wire_format_is_camel_case() {
        let material = Material {
            id: "m1".to_string(),
            name: "Plate".to_string(),
            sku: "PL-01".to_string(),
            unit: Unit::Piece,
            purchase_price: Money::from_minor(5_000),
            stock: Decimal::new(105, 1),
            supplier: None,
            description: None,
        };
        let value = serde_json::to_value(&material).unwrap();
        assert_eq!(value["purchasePrice"], 5_000);
        assert_eq!(value["stock"], "10.5");
        assert_eq!(value["unit"], "piece");
    }

    #[test]
    fn test_sale_cost_and_profit() {
        let product = Product {
            id: "p1".to_string(),
            name: "Battery 12V".to_string(),
            sku: "PIN-12V".to_string(),
            stock: 5,
            cost_price: Money::from_minor(60_000),
            selling_price: Money::from_minor(100_000),
        };
        let draft = SaleDraft {
            items: vec![CartItem::from_product(&product, 2)],
            subtotal: Money::from_minor(200_000),
            discount: Money::from_minor(10_000),
            total: Money::from_minor(190_000),
            customer: CustomerSnapshot::walk_in("Khách lẻ"),
            payment_method: PaymentMethod::Cash,
        };
        let operator = Operator {
            id: "u1".to_string(),
            name: "Lan".to_string(),
        };
        let sale = draft.into_sale("s1".to_string(), Utc::now(), &operator);

        assert_eq!(sale.cost().minor(), 120_000);
        assert_eq!(sale.profit().minor(), 70_000);
        assert_eq!(sale.user_name, "Lan");
    }
}
