//! Environmental impact tallies.
//!
//! Each eco-friendly line in an order counts for 2.5 kg of CO₂ saved, and
//! every three eco lines in the same order plant a tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Accumulated eco impact across orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoImpact {
    /// Kilograms of CO₂.
    pub co2_saved: Decimal,
    pub eco_products: u64,
    pub trees_planted: u64,
}

impl EcoImpact {
    /// CO₂ saved per eco-friendly line, in kilograms.
    pub const CO2_PER_ECO_LINE: Decimal = Decimal::from_parts(25, 0, 0, false, 1);
    pub const ECO_LINES_PER_TREE: u64 = 3;

    /// Fold one order with `eco_lines` eco-friendly lines into the tally.
    pub fn record_order(&mut self, eco_lines: u64) {
        self.co2_saved += Self::CO2_PER_ECO_LINE * Decimal::from(eco_lines);
        self.eco_products += eco_lines;
        self.trees_planted += eco_lines / Self::ECO_LINES_PER_TREE;
    }

    /// Tally a sequence of orders, each given by its eco line count.
    #[must_use]
    pub fn from_orders(eco_lines_per_order: impl IntoIterator<Item = u64>) -> Self {
        let mut impact = Self::default();
        for eco_lines in eco_lines_per_order {
            impact.record_order(eco_lines);
        }
        impact
    }
}
