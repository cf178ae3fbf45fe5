//! Session wishlist.

use serde::{Deserialize, Serialize};

use ecostore_core::ProductId;

/// An ordered set of saved products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist(Vec<ProductId>);

impl Wishlist {
    #[must_use]
    pub fn items(&self) -> &[ProductId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.0.contains(&product_id)
    }

    /// Save a product. Adding one already saved is a no-op; returns whether
    /// it was newly added.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.0.push(product_id);
        true
    }

    /// Returns whether the product was saved.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.0.len();
        self.0.retain(|id| *id != product_id);
        self.0.len() != before
    }

    pub fn retain(&mut self, keep: impl FnMut(&ProductId) -> bool) {
        self.0.retain(keep);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
