//! Product repository.

use std::collections::HashMap;

use chrono::Utc;

use ecostore_core::ProductId;

use super::{Database, RepositoryError};
use crate::models::{Product, ProductInput};

/// Repository for catalog operations.
pub struct ProductRepository<'a> {
    db: &'a Database,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All products in id order.
    pub async fn list(&self) -> Vec<Product> {
        self.db.read().await.products.clone()
    }

    pub async fn count(&self) -> usize {
        self.db.read().await.products.len()
    }

    pub async fn get(&self, id: ProductId) -> Option<Product> {
        self.db
            .read()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Look up several products at once. Missing ids are absent from the map.
    pub async fn get_many(&self, ids: &[ProductId]) -> HashMap<ProductId, Product> {
        let tables = self.db.read().await;
        tables
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| (p.id, p.clone()))
            .collect()
    }

    /// Insert a product. The input must already be validated.
    pub async fn create(&self, input: ProductInput) -> Product {
        let mut tables = self.db.write().await;
        let now = Utc::now();
        let product = Product {
            id: tables.next_product_id(),
            name: input.name,
            description: input.description,
            image_url: input.image_url,
            price: input.price,
            tags: input.tags,
            is_eco_friendly: input.is_eco_friendly,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        product
    }

    /// Replace every editable field of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, RepositoryError> {
        let mut tables = self.db.write().await;
        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;

        product.name = input.name;
        product.description = input.description;
        product.image_url = input.image_url;
        product.price = input.price;
        product.tags = input.tags;
        product.is_eco_friendly = input.is_eco_friendly;
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    /// Remove a product from the catalog. Past orders keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut tables = self.db.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        if tables.products.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecostore_core::Price;

    use super::*;

    fn input(name: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: String::new(),
            image_url: String::new(),
            price: Price::from_rupees(10),
            tags: vec![],
            is_eco_friendly: true,
        }
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let db = Database::new();
        let repo = ProductRepository::new(&db);

        let first = repo.create(input("Jar")).await;
        repo.delete(first.id).await.unwrap();
        let second = repo.create(input("Cup")).await;

        assert_ne!(first.id, second.id);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_update_and_missing() {
        let db = Database::new();
        let repo = ProductRepository::new(&db);
        let product = repo.create(input("Jar")).await;

        let updated = repo.update(product.id, input("Glass Jar")).await.unwrap();
        assert_eq!(updated.name, "Glass Jar");
        assert_eq!(repo.get(product.id).await.unwrap().name, "Glass Jar");

        assert!(matches!(
            repo.update(ProductId::new(999), input("X")).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.delete(ProductId::new(999)).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_get_many_skips_missing() {
        let db = Database::new();
        let repo = ProductRepository::new(&db);
        let jar = repo.create(input("Jar")).await;

        let found = repo.get_many(&[jar.id, ProductId::new(42)]).await;
        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&jar.id));
    }
}
