//! # Money Module
//!
//! Provides the `Money` type for monetary values and `Rate` for percentages.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing prices as floats drifts:                                       │
//! │    49.9 × 3 + 89.9 × 2 = 329.49999999999994                             │
//! │                                                                         │
//! │  OUR SOLUTION: Fixed-Point Integers (4 decimal places)                  │
//! │    499000 × 3 + 899000 × 2 = 3295000 units = R$ 329.50, exactly         │
//! │    Rounding to 2 decimals happens once, when a value is presented      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The inventory backend speaks decimal numbers (`"preco": 49.9`). `Money`
//! converts at the serde boundary and keeps four decimal places, finer than
//! the two shown on screen, so a `0.125` price is summed as `0.125`. Rounding
//! to cents happens only in [`Money::cents`], `Display` and
//! [`Money::to_decimal_string`].
//!
//! Arithmetic saturates instead of overflowing; validation caps item prices
//! at [`crate::MAX_ITEM_PRICE`] well below that point.
//!
//! ## Usage
//! ```rust
//! use wardrobe_core::money::{Money, Rate};
//!
//! let price = Money::from_cents(4990); // R$ 49.90
//! let stock_value = price.multiply_quantity(3);
//! assert_eq!(stock_value.cents(), 14970);
//!
//! let margin = Rate::from_bps(3000); // 30%
//! assert_eq!(stock_value.apply_rate(margin).cents(), 4491);
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use ts_rs::TS;

/// Units per major unit (R$ 1.00 = 10_000 units).
pub const SCALE: i64 = 10_000;

const UNITS_PER_CENT: i64 = SCALE / 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in ten-thousandths of the major unit.
///
/// ## Where Money is Used
/// ```text
/// Item.price ──┬──► price × stock ──► Summary.total_value
///              ├──► price × sold  ──► Summary.total_sales_value ──► × 30% ──► estimated_profit
///              └──► mean(price)   ──► "average price by type" chart
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents.saturating_mul(UNITS_PER_CENT))
    }

    /// Creates a Money value from ten-thousandths.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Converts a wire decimal (`49.9`) into Money, keeping four decimal
    /// places. Returns `None` for NaN and infinities.
    ///
    /// ```rust
    /// use wardrobe_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(49.9).map(|m| m.cents()), Some(4990));
    /// assert_eq!(Money::from_decimal(0.125).map(|m| m.units()), Some(1250));
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // `as` saturates out-of-range floats
        Some(Money((value * SCALE as f64).round() as i64))
    }

    /// Returns the exact value in ten-thousandths.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns the value rounded to cents, half away from zero.
    #[inline]
    pub const fn cents(&self) -> i64 {
        let whole = self.0 / UNITS_PER_CENT;
        let rest = self.0 % UNITS_PER_CENT;
        if rest.abs() * 2 >= UNITS_PER_CENT {
            whole + rest.signum()
        } else {
            whole
        }
    }

    /// Returns the major unit portion of the rounded value.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.cents() / 100
    }

    /// Returns the minor unit portion of the rounded value (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.cents() % 100).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity (stock or units sold).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Applies a percentage rate.
    ///
    /// The rate is applied to an already-summed amount, so a total computed
    /// as `Σ(price × sold).apply_rate(r)` is rounded to cents only when shown.
    ///
    /// ```rust
    /// use wardrobe_core::money::{Money, Rate};
    ///
    /// // R$ 49.95 × 30% = R$ 14.985 → R$ 14.99
    /// let profit = Money::from_cents(4995).apply_rate(Rate::from_bps(3000));
    /// assert_eq!(profit.cents(), 1499);
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let scaled = i128::from(self.0) * i128::from(rate.bps());
        let half = if scaled < 0 { -5000 } else { 5000 };
        let units = (scaled + half) / 10000;
        Money(i64::try_from(units).unwrap_or(if units < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Value in major units as a float, for chart axes only.
    #[inline]
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    /// Fixed two-decimal presentation (`"100.00"`).
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.cents() < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }

    /// Shortest decimal form (`"49.9"`, `"50"`, `"129.95"`, `"0.125"`).
    ///
    /// This is the string the free-text search matches against, so a search
    /// for `"49.9"` finds an item priced R$ 49.90.
    pub fn to_search_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = self.0.unsigned_abs();
        let scale = SCALE.unsigned_abs();
        let major = units / scale;
        match units % scale {
            0 => format!("{}{}", sign, major),
            fraction => {
                let digits = format!("{:04}", fraction);
                format!("{}{}.{}", sign, major, digits.trim_end_matches('0'))
            }
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents() < 0 { "-" } else { "" };
        write!(f, "{}R$ {}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

/// Serialized as a decimal number in major units (`49.9`).
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_decimal(value)
            .ok_or_else(|| de::Error::custom(format!("invalid monetary amount: {}", value)))
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A percentage in basis points (1 bp = 0.01%).
///
/// 3000 bps = 30%, the fixed margin behind the estimated profit figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_decimal_keeps_sub_cent_precision() {
        assert_eq!(Money::from_decimal(49.9).unwrap().cents(), 4990);
        assert_eq!(Money::from_decimal(89.99).unwrap().cents(), 8999);
        assert_eq!(Money::from_decimal(0.125).unwrap().units(), 1250);
        assert!(Money::from_decimal(f64::INFINITY).is_none());
    }

    #[test]
    fn test_cents_round_half_away_from_zero() {
        assert_eq!(Money::from_units(1250).cents(), 13);
        assert_eq!(Money::from_units(1249).cents(), 12);
        assert_eq!(Money::from_units(-1250).cents(), -13);
        assert_eq!(Money::from_units(1250).to_decimal_string(), "0.13");
    }

    #[test]
    fn test_sub_cent_prices_accumulate_exactly() {
        // 1000 × R$ 0.125 is R$ 125.00, not 1000 × R$ 0.13
        let price = Money::from_decimal(0.125).unwrap();
        assert_eq!(price.multiply_quantity(1000).to_decimal_string(), "125.00");
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_units(i64::MAX);
        assert_eq!(huge.multiply_quantity(2), huge);
        assert_eq!(huge + Money::from_cents(1), huge);
        assert_eq!(Money::from_decimal(1e300).unwrap(), huge);
        assert_eq!(huge.apply_rate(Rate::from_bps(20000)), huge);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "R$ 10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "R$ 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-R$ 5.50");
        assert_eq!(format!("{}", Money::zero()), "R$ 0.00");
    }

    #[test]
    fn test_decimal_and_search_strings() {
        assert_eq!(Money::from_cents(10000).to_decimal_string(), "100.00");
        assert_eq!(Money::from_cents(4990).to_search_string(), "49.9");
        assert_eq!(Money::from_cents(5000).to_search_string(), "50");
        assert_eq!(Money::from_cents(12995).to_search_string(), "129.95");
        assert_eq!(Money::from_cents(5).to_search_string(), "0.05");
        assert_eq!(Money::from_units(1250).to_search_string(), "0.125");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply_quantity(3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_apply_rate_rounds_once() {
        // R$ 550.00 × 30% = R$ 165.00
        let sales = Money::from_cents(55000);
        assert_eq!(sales.apply_rate(Rate::from_bps(3000)).cents(), 16500);

        // R$ 0.05 × 30% = 1.5 cents → 2 cents
        assert_eq!(Money::from_cents(5).apply_rate(Rate::from_bps(3000)).cents(), 2);
    }

    #[test]
    fn test_serde_uses_decimal_numbers() {
        let price: Money = serde_json::from_str("49.9").unwrap();
        assert_eq!(price.cents(), 4990);

        let whole: Money = serde_json::from_str("100").unwrap();
        assert_eq!(whole.cents(), 10000);

        assert_eq!(serde_json::to_string(&Money::from_cents(16500)).unwrap(), "165.0");
    }

    #[test]
    fn test_rate_percentage() {
        let rate = Rate::from_bps(3000);
        assert_eq!(rate.bps(), 3000);
        assert!((rate.percentage() - 30.0).abs() < 0.001);
    }
}
