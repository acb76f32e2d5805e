//! # Report Aggregator
//!
//! Folds the sales ledger over a date window into revenue, cost and
//! profit totals, per-product performance and a daily trend.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales ──► in window? ──► totals                                        │
//! │            (local date       revenue = Σ sale.total                     │
//! │             in [start, end])  cost    = Σ item.costPrice × qty          │
//! │                               profit  = revenue − cost                  │
//! │                      │                                                  │
//! │                      ├──► per product (by productId, revenue desc)      │
//! │                      │    revenue ≈ sellingPrice × qty − item discount  │
//! │                      │                                                  │
//! │                      └──► per day (full date, label dd/mm, ascending)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every accumulation is a sum keyed by id or date, so the result does not
//! depend on the order of the input ledger.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::Sale;

// =============================================================================
// Window
// =============================================================================

/// An inclusive range of calendar days in the shop's time zone.
///
/// `start` covers from 00:00:00 and `end` up to 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub offset: FixedOffset,
}

impl ReportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, offset: FixedOffset) -> Self {
        ReportWindow { start, end, offset }
    }

    /// Calendar day of `instant` in the shop's time zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Whether `instant` falls in the window. A reversed window is empty.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let day = self.local_date(instant);
        self.start <= day && day <= self.end
    }
}

// =============================================================================
// Report Types
// =============================================================================

/// Sales of one product over the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPerformance {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub revenue: Money,
    pub profit: Money,
}

/// Revenue and profit of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// `dd/mm`, for chart axes.
    pub label: String,
    pub revenue: Money,
    pub profit: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
    pub sale_count: usize,
    pub total_revenue: Money,
    pub total_cost: Money,
    pub total_profit: Money,
    /// Sorted by revenue, highest first.
    pub product_performance: Vec<ProductPerformance>,
    /// Sorted by date, oldest first.
    pub daily_trend: Vec<DailyPoint>,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Builds the report for `window` from the full sales ledger.
pub fn build_report(sales: &[Sale], window: &ReportWindow) -> SalesReport {
    // Later sales win the display name/SKU of a product, whatever the
    // ledger order.
    let mut in_window: Vec<&Sale> = sales.iter().filter(|s| window.contains(s.date)).collect();
    in_window.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut total_revenue = Money::zero();
    let mut total_cost = Money::zero();
    let mut products: BTreeMap<&str, ProductPerformance> = BTreeMap::new();
    let mut days: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();

    for sale in &in_window {
        let sale_cost = sale.cost();
        total_revenue += sale.total;
        total_cost += sale_cost;

        let day = days
            .entry(window.local_date(sale.date))
            .or_insert((Money::zero(), Money::zero()));
        day.0 += sale.total;
        day.1 += sale.total - sale_cost;

        for item in &sale.items {
            let revenue = item.line_total() - item.discount.unwrap_or_default();
            let entry = products
                .entry(item.product_id.as_str())
                .or_insert_with(|| ProductPerformance {
                    product_id: item.product_id.clone(),
                    name: String::new(),
                    sku: String::new(),
                    quantity: 0,
                    revenue: Money::zero(),
                    profit: Money::zero(),
                });
            entry.name.clone_from(&item.name);
            entry.sku.clone_from(&item.sku);
            entry.quantity += item.quantity;
            entry.revenue += revenue;
            entry.profit += revenue - item.line_cost();
        }
    }

    let mut product_performance: Vec<ProductPerformance> = products.into_values().collect();
    product_performance.sort_by(|a, b| {
        b.revenue
            .cmp(&a.revenue)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });

    let daily_trend = days
        .into_iter()
        .map(|(date, (revenue, profit))| DailyPoint {
            date,
            label: date.format("%d/%m").to_string(),
            revenue,
            profit,
        })
        .collect();

    SalesReport {
        start: window.start,
        end: window.end,
        sale_count: in_window.len(),
        total_revenue,
        total_cost,
        total_profit: total_revenue - total_cost,
        product_performance,
        daily_trend,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
