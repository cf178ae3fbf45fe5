//! Catalog browsing.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use ecostore_core::{Price, ProductId, UserId};

use crate::db::{Database, OrderRepository, ProductRepository, RepositoryError, UserRepository};
use crate::models::{Product, SoldProduct};

/// How many products a recommendation list holds.
pub const RECOMMENDATION_LIMIT: usize = 6;

/// Sort orders accepted by the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    Name,
    PriceLow,
    PriceHigh,
    Newest,
}

/// Product listing filters, taken from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Case-insensitive text matched against name, description and tags.
    pub q: Option<String>,
    /// Tag to filter by; `all` means no tag filter.
    pub tag: Option<String>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    #[serde(default)]
    pub eco_only: bool,
    /// Without a sort the catalog order (by id) is kept.
    pub sort: Option<ProductSort>,
}

impl ProductQuery {
    /// Filter and sort `products`.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let needle = self
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let tag = self
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("all"));

        let mut matched: Vec<Product> = products
            .into_iter()
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_text(n)))
            .filter(|p| tag.is_none_or(|t| p.has_tag(t)))
            .filter(|p| self.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| self.max_price.is_none_or(|max| p.price <= max))
            .filter(|p| !self.eco_only || p.is_eco_friendly)
            .collect();

        match self.sort {
            Some(ProductSort::Name) => {
                matched.sort_by_cached_key(|p| (p.name.to_lowercase(), p.id));
            }
            Some(ProductSort::PriceLow) => matched.sort_by_key(|p| (p.price, p.id)),
            Some(ProductSort::PriceHigh) => matched.sort_by_key(|p| (Reverse(p.price), p.id)),
            Some(ProductSort::Newest) => {
                matched.sort_by_key(|p| Reverse((p.created_at, p.id)));
            }
            None => {}
        }
        matched
    }
}

/// A tag and the number of products carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Read-side catalog operations.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    orders: OrderRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            products: ProductRepository::new(db),
            orders: OrderRepository::new(db),
            users: UserRepository::new(db),
        }
    }

    pub async fn search(&self, query: &ProductQuery) -> Vec<Product> {
        query.apply(self.products.list().await)
    }

    /// Every tag in the catalog with its product count, most common first.
    pub async fn categories(&self) -> Vec<TagCount> {
        let products = self.products.list().await;
        let mut counts: HashMap<String, usize> = HashMap::new();
        for product in &products {
            let mut seen: HashSet<String> = HashSet::new();
            for tag in &product.tags {
                let key = tag.to_lowercase();
                if seen.insert(key.clone()) {
                    *counts.entry(key).or_insert(0) += 1;
                }
            }
        }

        let mut tags: Vec<TagCount> = counts
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        tags
    }

    /// Fetch a product, recording the view for a signed-in shopper.
    pub async fn view(&self, id: ProductId, viewer: Option<UserId>) -> Option<Product> {
        let product = self.products.get(id).await?;
        if let Some(user_id) = viewer {
            if let Err(e) = self.users.record_view(user_id, id).await {
                tracing::warn!(user_id = %user_id, error = %e, "Failed to record product view");
            }
        }
        Some(product)
    }

    /// Products sharing tags with the user's recently viewed ones.
    ///
    /// Viewed products are never recommended. With no usable history the
    /// eco-friendly range is suggested instead.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn recommendations(&self, user_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await
            .ok_or(RepositoryError::NotFound)?;
        let products = self.products.list().await;
        Ok(recommend(&products, &user.history))
    }

    /// Catalog products with units sold, best sellers first.
    ///
    /// Cancelled orders are not counted. Products that were deleted after
    /// being sold are skipped.
    pub async fn sold_products(&self) -> Vec<SoldProduct> {
        let sold = self.orders.sold_quantities().await;
        let ids: Vec<ProductId> = sold.keys().copied().collect();
        let products = self.products.get_many(&ids).await;

        let mut listing: Vec<SoldProduct> = products
            .into_values()
            .map(|product| SoldProduct {
                sold_quantity: sold.get(&product.id).copied().unwrap_or(0),
                product,
            })
            .collect();
        listing.sort_by_key(|s| (Reverse(s.sold_quantity), s.product.id));
        listing
    }
}

fn recommend(products: &[Product], history: &[ProductId]) -> Vec<Product> {
    let viewed_tags: HashSet<String> = products
        .iter()
        .filter(|p| history.contains(&p.id))
        .flat_map(|p| p.tags.iter().map(|t| t.to_lowercase()))
        .collect();

    let mut scored: Vec<(usize, &Product)> = products
        .iter()
        .filter(|p| !history.contains(&p.id))
        .map(|p| {
            let shared = p
                .tags
                .iter()
                .filter(|t| viewed_tags.contains(&t.to_lowercase()))
                .count();
            (shared, p)
        })
        .filter(|(shared, _)| *shared > 0)
        .collect();

    if scored.is_empty() {
        return products
            .iter()
            .filter(|p| p.is_eco_friendly && !history.contains(&p.id))
            .take(RECOMMENDATION_LIMIT)
            .cloned()
            .collect();
    }

    scored.sort_by_key(|(shared, p)| (Reverse(*shared), p.id));
    scored
        .into_iter()
        .take(RECOMMENDATION_LIMIT)
        .map(|(_, p)| p.clone())
        .collect()
}
