//! Pricing the session cart against the live catalog.

use serde::Serialize;

use ecostore_core::{OrderTotals, Price, PricedLine, PricingPolicy, ProductId};

use crate::db::{Database, ProductRepository};
use crate::models::{Cart, CartError, Product};

/// Errors from adding to the cart.
#[derive(Debug, thiserror::Error)]
pub enum CartUpdateError {
    #[error("Product not found")]
    UnknownProduct(ProductId),
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A cart line joined with its product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub line_total: Price,
}

/// The cart as shown to the shopper.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub totals: OrderTotals,
}

pub struct CartService<'a> {
    products: ProductRepository<'a>,
    pricing: &'a PricingPolicy,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database, pricing: &'a PricingPolicy) -> Self {
        Self {
            products: ProductRepository::new(db),
            pricing,
        }
    }

    /// Add a catalog product to `cart`, returning the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartUpdateError::UnknownProduct` if the product is not in the
    /// catalog, or `CartUpdateError::Cart` if the quantity limit is hit.
    pub async fn add_item(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<u32, CartUpdateError> {
        if self.products.get(product_id).await.is_none() {
            return Err(CartUpdateError::UnknownProduct(product_id));
        }
        Ok(cart.add(product_id, quantity)?)
    }

    /// Join `cart` with current catalog prices and quote it.
    ///
    /// Lines whose product has left the catalog are dropped from `cart`.
    /// Returns the view and whether `cart` changed.
    pub async fn resolve(&self, cart: &mut Cart) -> (CartView, bool) {
        let ids: Vec<ProductId> = cart.items().iter().map(|i| i.product_id).collect();
        let products = self.products.get_many(&ids).await;

        let before = cart.items().len();
        cart.retain_products(|id| products.contains_key(&id));
        let pruned = cart.items().len() != before;

        let items: Vec<CartLine> = cart
            .items()
            .iter()
            .filter_map(|item| {
                products.get(&item.product_id).map(|product| CartLine {
                    line_total: product.price.times(item.quantity),
                    product: product.clone(),
                    quantity: item.quantity,
                })
            })
            .collect();
        let lines: Vec<PricedLine> = items
            .iter()
            .map(|line| PricedLine::new(line.product.price, line.quantity))
            .collect();
        let totals = self.pricing.quote(&lines, cart.promo_code());

        (CartView { items, totals }, pruned)
    }
}
