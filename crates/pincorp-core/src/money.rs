//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer smallest units                                   │
//! │    Prices are whole đồng (VND has no minor unit in practice).          │
//! │    Order totals, cart totals and report sums are exact integer sums.   │
//! │                                                                         │
//! │  Only material costs multiply money by a fractional quantity           │
//! │  (2.5 m of wire); those are computed in exact decimal and rounded      │
//! │  ONCE, half away from zero, when converted back to Money.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pincorp_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let plate = Money::from_minor(5_000);
//! let line = plate * 6;
//! assert_eq!(line.minor(), 30_000);
//!
//! let wire = Money::from_minor(3_333);
//! assert_eq!(wire.times_decimal(Decimal::new(15, 1)).minor(), 5_000); // 4999.5 → 5000
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the currency's smallest unit (đồng for VND).
///
/// ## Design Decisions
/// - **i64 (signed)**: Profit can be negative, discounts subtract
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Newtype serde**: serialises as a plain JSON number
///
/// ## Where Money is Used
/// ```text
/// Material.purchasePrice ──► RequiredMaterial cost ──► Order.materialsCost
///                                                          │
/// AdditionalCost.amount ───────────────────────────────────┴─► Order.totalCost
///                                                                  │
///                                        Product.costPrice ◄───────┘ (÷ qty)
///
/// Product.sellingPrice ──► CartItem ──► Sale.subtotal ──► Sale.total ──► Report
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a whole quantity.
    ///
    /// ## Example
    /// ```rust
    /// use pincorp_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(100_000);
    /// assert_eq!(unit_price.multiply_quantity(2).minor(), 200_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Money(sum)),
            None => None,
        }
    }

    /// Adds two amounts, clamping at the i64 bounds.
    #[inline]
    pub const fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Returns the value as an exact decimal.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Rounds a decimal amount to the nearest whole unit, half away from zero.
    ///
    /// Values outside the i64 range saturate.
    pub fn from_decimal_rounded(amount: Decimal) -> Self {
        let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let saturated = if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        };
        Money(rounded.to_i64().unwrap_or(saturated))
    }

    /// Multiplies money by a (possibly fractional) quantity and rounds once.
    pub fn times_decimal(&self, qty: Decimal) -> Self {
        Money::from_decimal_rounded(self.to_decimal() * qty)
    }

    /// Splits an amount evenly over a whole quantity, rounded half away from zero.
    ///
    /// Returns zero when `qty` is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use pincorp_core::money::Money;
    ///
    /// // 100 000 ₫ of cost over 3 batteries = 33 333 ₫ each
    /// assert_eq!(Money::from_minor(100_000).per_unit(3).minor(), 33_333);
    /// ```
    pub fn per_unit(&self, qty: i64) -> Self {
        if qty <= 0 {
            return Money::zero();
        }
        Money::from_decimal_rounded(self.to_decimal() / Decimal::from(qty))
    }

    /// Expresses `self` as a fraction of `base`, in basis points.
    ///
    /// Returns a zero rate when `base` is zero.
    ///
    /// ## Example
    /// ```rust
    /// use pincorp_core::money::Money;
    ///
    /// let profit = Money::from_minor(25_000);
    /// let cost = Money::from_minor(100_000);
    /// assert_eq!(profit.ratio_of(cost).bps(), 2_500); // 25%
    /// ```
    pub fn ratio_of(&self, base: Money) -> Rate {
        if base.is_zero() {
            return Rate::zero();
        }
        let bps = self.to_decimal() * Decimal::from(10_000) / base.to_decimal();
        Rate::from_bps(Money::from_decimal_rounded(bps).minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display groups thousands with dots and appends the đồng sign.
///
/// ## Note
/// This is for logs and debugging. The console formats with its
/// configured symbol and separators.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{} ₫", sign, group_thousands(self.0.unsigned_abs(), '.'))
    }
}

/// Groups the digits of `value` in threes using `separator`.
pub fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a whole quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sums saturate rather than overflow; callers compare the result with
/// [`MAX_AMOUNT`](crate::MAX_AMOUNT) before storing it.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
