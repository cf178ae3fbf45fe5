//! Checkout: turns the session cart into an order.
//!
//! Totals are always recomputed here from catalog prices and the store's
//! pricing policy. Nothing the client sends about money is used.

use tracing::{info, instrument};

use ecostore_core::{PricedLine, PricingPolicy, ProductId, UserId};

use crate::db::orders::PlacedOrder;
use crate::db::{Database, OrderRepository, ProductRepository, RepositoryError};
use crate::models::{Cart, OrderLine};

/// Errors from placing an order.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct CheckoutService<'a> {
    products: ProductRepository<'a>,
    orders: OrderRepository<'a>,
    pricing: &'a PricingPolicy,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database, pricing: &'a PricingPolicy) -> Self {
        Self {
            products: ProductRepository::new(db),
            orders: OrderRepository::new(db),
            pricing,
        }
    }

    /// Place an order for everything in `cart` and credit the points.
    ///
    /// On success `cart` is emptied and its promo code dropped. Lines for
    /// products no longer in the catalog are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when no purchasable lines remain,
    /// or `CheckoutError::Repository` if the buyer does not exist.
    #[instrument(skip(self, cart))]
    pub async fn place_order(&self, user_id: UserId, cart: &mut Cart) -> Result<PlacedOrder, CheckoutError> {
        let ids: Vec<ProductId> = cart.items().iter().map(|i| i.product_id).collect();
        let products = self.products.get_many(&ids).await;

        let items: Vec<OrderLine> = cart
            .items()
            .iter()
            .filter_map(|item| {
                products
                    .get(&item.product_id)
                    .map(|product| OrderLine::from_product(product, item.quantity))
            })
            .collect();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines: Vec<PricedLine> = items.iter().map(OrderLine::priced).collect();
        let totals = self.pricing.quote(&lines, cart.promo_code());
        let placed = self.orders.place(user_id, items, totals).await?;
        cart.clear();

        info!(
            order_id = %placed.order.id,
            total = %placed.order.totals.total,
            points_earned = placed.order.points_earned,
            "Order placed"
        );
        Ok(placed)
    }
}
