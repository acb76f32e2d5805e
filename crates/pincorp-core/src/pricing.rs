//! # Product Pricing
//!
//! Profit and margin shown on the product editor. The selling price is
//! always set by staff; nothing here derives it from cost.

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Rate};

/// Profit figures for a cost/selling price pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub cost_price: Money,
    pub selling_price: Money,
    /// sellingPrice − costPrice.
    pub profit: Money,
    /// profit / costPrice; zero when there is no cost basis yet.
    pub margin: Rate,
    /// Advisory flag, never blocks the save.
    pub is_low_margin: bool,
}

/// Computes profit and margin, flagging margins below `low_margin`.
///
/// ## Example
/// ```rust
/// use pincorp_core::pricing::quote;
/// use pincorp_core::{Money, Rate};
///
/// let q = quote(Money::from_minor(40_000), Money::from_minor(46_000), Rate::from_bps(2_000));
/// assert_eq!(q.margin.bps(), 1_500);
/// assert!(q.is_low_margin);
/// ```
pub fn quote(cost_price: Money, selling_price: Money, low_margin: Rate) -> PriceQuote {
    let profit = selling_price - cost_price;
    let margin = profit.ratio_of(cost_price);
    PriceQuote {
        cost_price,
        selling_price,
        profit,
        margin,
        is_low_margin: margin < low_margin,
    }
}

impl Product {
    /// Quote for the current prices.
    pub fn quote(&self, low_margin: Rate) -> PriceQuote {
        quote(self.cost_price, self.selling_price, low_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LOW_MARGIN_BPS;

    fn threshold() -> Rate {
        Rate::from_bps(LOW_MARGIN_BPS)
    }

    #[test]
    fn test_quote() {
        let q = quote(Money::from_minor(40_000), Money::from_minor(60_000), threshold());
        assert_eq!(q.profit.minor(), 20_000);
        assert_eq!(q.margin.bps(), 5_000);
        assert!(!q.is_low_margin);
    }

    #[test]
    fn test_margin_at_threshold_is_not_low() {
        let q = quote(Money::from_minor(100_000), Money::from_minor(120_000), threshold());
        assert_eq!(q.margin.bps(), 2_000);
        assert!(!q.is_low_margin);
    }

    #[test]
    fn test_selling_below_cost() {
        let q = quote(Money::from_minor(50_000), Money::from_minor(45_000), threshold());
        assert_eq!(q.profit.minor(), -5_000);
        assert_eq!(q.margin.bps(), -1_000);
        assert!(q.is_low_margin);
    }

    #[test]
    fn test_zero_cost_has_zero_margin() {
        let q = quote(Money::zero(), Money::from_minor(10_000), threshold());
        assert!(q.margin.is_zero());
        assert!(q.is_low_margin);
    }
}
