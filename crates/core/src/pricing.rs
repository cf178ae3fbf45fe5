//! Cart and order price computation.
//!
//! A quote is built from priced lines and an optional promo code:
//!
//! ```text
//! subtotal = Σ unit_price × quantity
//! shipping = 0 if subtotal > free_shipping_threshold, else shipping_fee
//! tax      = subtotal × tax_rate
//! discount = subtotal × promo rate
//! total    = subtotal + shipping + tax − discount
//! ```
//!
//! Every component is rounded to paise before it is summed, so the parts
//! shown to a shopper always add up to the total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Price;

/// Errors from building a [`PricingPolicy`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("tax rate must be between 0 and 1, got {0}")]
    TaxRateOutOfRange(Decimal),
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
}

/// Errors from parsing a [`PromoCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PromoError {
    #[error("Invalid promo code")]
    Unknown(String),
}

/// A promotional discount code. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromoCode {
    /// 10% off.
    #[serde(rename = "SAVE10")]
    Save10,
    /// 15% off for new shoppers.
    #[serde(rename = "WELCOME")]
    Welcome,
    /// 20% off.
    #[serde(rename = "ECO20")]
    Eco20,
}

impl PromoCode {
    pub const ALL: [Self; 3] = [Self::Save10, Self::Welcome, Self::Eco20];

    /// The code as shoppers type it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Save10 => "SAVE10",
            Self::Welcome => "WELCOME",
            Self::Eco20 => "ECO20",
        }
    }

    /// Fraction of the subtotal taken off.
    #[must_use]
    pub const fn rate(self) -> Decimal {
        match self {
            Self::Save10 => Decimal::from_parts(10, 0, 0, false, 2),
            Self::Welcome => Decimal::from_parts(15, 0, 0, false, 2),
            Self::Eco20 => Decimal::from_parts(20, 0, 0, false, 2),
        }
    }
}

impl std::fmt::Display for PromoCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PromoCode {
    type Err = PromoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PromoError::Unknown(wanted.to_owned()))
    }
}

/// One cart or order line reduced to what pricing needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Price,
    pub quantity: u32,
}

impl PricedLine {
    #[must_use]
    pub const fn new(unit_price: Price, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A full price breakdown for a cart or order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub item_count: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub discount: Price,
    pub total: Price,
    /// How much more the shopper must add to qualify for free shipping.
    pub free_shipping_remaining: Option<Price>,
    pub promo_code: Option<PromoCode>,
}

impl OrderTotals {
    /// Totals for an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item_count: 0,
            subtotal: Price::zero(),
            shipping: Price::zero(),
            tax: Price::zero(),
            discount: Price::zero(),
            total: Price::zero(),
            free_shipping_remaining: None,
            promo_code: None,
        }
    }
}

/// Store-wide pricing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Flat GST rate applied to the subtotal.
    pub tax_rate: Decimal,
    /// Subtotals strictly above this ship free.
    pub free_shipping_threshold: Price,
    pub shipping_fee: Price,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(18, 2),
            free_shipping_threshold: Price::from_rupees(4000),
            shipping_fee: Price::from_rupees(99),
        }
    }
}

impl PricingPolicy {
    /// Build a policy, rejecting negative amounts and tax rates outside `0..=1`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError`] for out-of-range values.
    pub fn new(
        tax_rate: Decimal,
        free_shipping_threshold: Price,
        shipping_fee: Price,
    ) -> Result<Self, PricingError> {
        if tax_rate.is_sign_negative() || tax_rate > Decimal::ONE {
            return Err(PricingError::TaxRateOutOfRange(tax_rate));
        }
        if free_shipping_threshold.is_negative() {
            return Err(PricingError::Negative {
                field: "free shipping threshold",
            });
        }
        if shipping_fee.is_negative() {
            return Err(PricingError::Negative {
                field: "shipping fee",
            });
        }
        Ok(Self {
            tax_rate,
            free_shipping_threshold,
            shipping_fee,
        })
    }

    /// Shipping charged on a given subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Price) -> Price {
        if subtotal > self.free_shipping_threshold {
            Price::zero()
        } else {
            self.shipping_fee
        }
    }

    /// Price a set of lines.
    ///
    /// Lines with zero quantity contribute nothing. A cart with no units at
    /// all is quoted as zero everywhere, shipping included.
    #[must_use]
    pub fn quote(&self, lines: &[PricedLine], promo: Option<PromoCode>) -> OrderTotals {
        let item_count = lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity));
        if item_count == 0 {
            return OrderTotals {
                promo_code: promo,
                ..OrderTotals::empty()
            };
        }

        let subtotal = lines.iter().map(PricedLine::line_total).sum::<Price>().rounded();
        let shipping = self.shipping_for(subtotal);
        let tax = subtotal.scaled(self.tax_rate).rounded();
        let discount = promo
            .map_or_else(Price::zero, |code| subtotal.scaled(code.rate()).rounded());
        let total = subtotal + shipping + tax - discount;
        let free_shipping_remaining =
            (subtotal < self.free_shipping_threshold).then(|| self.free_shipping_threshold - subtotal);

        OrderTotals {
            item_count,
            subtotal,
            shipping,
            tax,
            discount,
            total,
            free_shipping_remaining,
            promo_code: promo,
        }
    }
}
