//! Session cart.

use serde::{Deserialize, Serialize};

use ecostore_core::{ProductId, PromoCode};

/// A product reference and quantity in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Errors from changing cart quantities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    #[error("quantity cannot exceed {max} per item")]
    QuantityTooLarge { max: u32 },
    #[error("product is not in the cart")]
    NotInCart(ProductId),
}

/// A visitor's cart: ordered lines plus an applied promo code.
///
/// Each product appears at most once. Lines keep the order in which
/// products were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    promo_code: Option<PromoCode>,
}

impl Cart {
    pub const MAX_QUANTITY: u32 = 99;

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn promo_code(&self) -> Option<PromoCode> {
        self.promo_code
    }

    pub const fn set_promo_code(&mut self, code: Option<PromoCode>) {
        self.promo_code = code;
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |sum, item| sum.saturating_add(item.quantity))
    }

    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Add `quantity` units, merging into an existing line. Returns the
    /// line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityTooLarge`] if the line would exceed
    /// [`Cart::MAX_QUANTITY`]; the cart is left unchanged.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<u32, CartError> {
        let quantity = quantity.max(1);
        let current = self.quantity_of(product_id);
        let updated = current.saturating_add(quantity);
        if updated > Self::MAX_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                max: Self::MAX_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = updated;
        } else {
            self.items.push(CartItem {
                product_id,
                quantity: updated,
            });
        }
        Ok(updated)
    }

    /// Replace a line's quantity. Zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] if the product has no line, or
    /// [`CartError::QuantityTooLarge`] above [`Cart::MAX_QUANTITY`].
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        let Some(index) = self.items.iter().position(|i| i.product_id == product_id) else {
            return Err(CartError::NotInCart(product_id));
        };
        if quantity <= 0 {
            self.items.remove(index);
            return Ok(());
        }
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q <= Self::MAX_QUANTITY)
            .ok_or(CartError::QuantityTooLarge {
                max: Self::MAX_QUANTITY,
            })?;
        if let Some(item) = self.items.get_mut(index) {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Keep only lines whose product satisfies `keep`.
    pub fn retain_products(&mut self, mut keep: impl FnMut(ProductId) -> bool) {
        self.items.retain(|i| keep(i.product_id));
    }

    /// Empty the cart and drop any promo code.
    pub fn clear(&mut self) {
        self.items.clear();
        self.promo_code = None;
    }
}
