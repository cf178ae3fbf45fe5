//! Order types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ecostore_core::{OrderId, OrderStatus, OrderTotals, Price, PricedLine, ProductId, UserId};

use super::Product;

/// A purchased line, snapshotted from the catalog at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
    pub is_eco_friendly: bool,
}

impl OrderLine {
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            is_eco_friendly: product.is_eco_friendly,
        }
    }

    #[must_use]
    pub const fn priced(&self) -> PricedLine {
        PricedLine::new(self.unit_price, self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub totals: OrderTotals,
    /// Points credited when the order was placed.
    pub points_earned: u64,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Number of eco-friendly lines, for impact stats.
    #[must_use]
    pub fn eco_lines(&self) -> u64 {
        self.items.iter().filter(|line| line.is_eco_friendly).count() as u64
    }
}

/// A catalog product with the number of units sold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldProduct {
    #[serde(flatten)]
    pub product: Product,
    pub sold_quantity: u64,
}
