//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are Indian rupees. The store never converts currencies, so a
//! price is a bare [`Decimal`] in the rupee unit (not paise).

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount of money in rupees.
///
/// Serializes as a decimal string (`"29.99"`) and deserializes from either a
/// string or a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "₹";

    /// Create a price from a decimal rupee amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// A zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// Create a price from paise (hundredths of a rupee).
    #[must_use]
    pub fn from_paise(paise: i64) -> Self {
        Self(Decimal::new(paise, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Line total for `quantity` units at this price.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Apply a fractional rate (`0.18` for 18%).
    #[must_use]
    pub fn scaled(self, rate: Decimal) -> Self {
        Self(self.0 * rate)
    }

    /// Round to paise, half away from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Whole rupees, rounded down. Negative amounts yield zero.
    #[must_use]
    pub fn whole_rupees(self) -> u64 {
        self.0.floor().to_u64().unwrap_or(0)
    }

    /// Format with the rupee symbol and Indian digit grouping
    /// (`₹1,23,456.50`).
    #[must_use]
    pub fn format_inr(&self) -> String {
        let rounded = self.rounded().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = format!("{:.2}", rounded.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!("{sign}{}{}.{fraction}", Self::SYMBOL, group_indian(whole))
    }
}

/// Insert separators the Indian way: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = front;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_inr())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::new(s.parse().unwrap())
    }

    #[test]
    fn test_format_inr_groups_lakhs_and_crores() {
        assert_eq!(price("0").format_inr(), "₹0.00");
        assert_eq!(price("99").format_inr(), "₹99.00");
        assert_eq!(price("4000").format_inr(), "₹4,000.00");
        assert_eq!(price("123456.5").format_inr(), "₹1,23,456.50");
        assert_eq!(price("12345678.901").format_inr(), "₹1,23,45,678.90");
        assert_eq!(price("-1500").format_inr(), "-₹1,500.00");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(price("10.005").rounded(), price("10.01"));
        assert_eq!(price("10.004").rounded(), price("10.00"));
    }

    #[test]
    fn test_arithmetic() {
        let total: Price = [price("29.99").times(2), price("15.50")].iter().sum();
        assert_eq!(total, price("75.48"));
        assert_eq!(total - price("0.48"), Price::from_rupees(75));
        assert_eq!(Price::from_paise(2999), price("29.99"));
    }

    #[test]
    fn test_whole_rupees_floors() {
        assert_eq!(price("89.97").whole_rupees(), 89);
        assert_eq!(price("-3").whole_rupees(), 0);
    }

    #[test]
    fn test_serde_accepts_string_and_number() {
        assert_eq!(serde_json::to_string(&price("29.99")).unwrap(), "\"29.99\"");
        let from_str: Price = serde_json::from_str("\"12.50\"").unwrap();
        let from_num: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(from_str, from_num);
    }
}
