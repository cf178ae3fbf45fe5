//! Catalog product types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecostore_core::{Price, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: Price,
    /// Free-form tags, also used as browse categories.
    pub tags: Vec<String>,
    pub is_eco_friendly: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product carries `tag` (case-insensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive match of `needle` against name, description and tags.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Errors from validating a [`ProductInput`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProductValidationError {
    #[error("product name is required")]
    EmptyName,
    #[error("product name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("price must be greater than zero")]
    NonPositivePrice,
    #[error("a product can have at most {max} tags")]
    TooManyTags { max: usize },
}

/// Fields an admin supplies to create or replace a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub price: Price,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_eco_friendly: bool,
}

impl ProductInput {
    pub const MAX_NAME_LENGTH: usize = 200;
    pub const MAX_TAGS: usize = 20;

    /// Trim text fields, drop blank and duplicate tags, and check limits.
    ///
    /// # Errors
    ///
    /// Returns [`ProductValidationError`] for an empty or overlong name, a
    /// price that is not positive, or too many tags.
    pub fn validate(mut self) -> Result<Self, ProductValidationError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ProductValidationError::EmptyName);
        }
        if self.name.chars().count() > Self::MAX_NAME_LENGTH {
            return Err(ProductValidationError::NameTooLong {
                max: Self::MAX_NAME_LENGTH,
            });
        }
        self.price = self.price.rounded();
        if self.price.is_zero() || self.price.is_negative() {
            return Err(ProductValidationError::NonPositivePrice);
        }

        self.description = self.description.trim().to_string();
        self.image_url = self.image_url.trim().to_string();

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|seen| seen.eq_ignore_ascii_case(tag)) {
                tags.push(tag.to_string());
            }
        }
        if tags.len() > Self::MAX_TAGS {
            return Err(ProductValidationError::TooManyTags {
                max: Self::MAX_TAGS,
            });
        }
        self.tags = tags;

        Ok(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(name: &str, price: &str, tags: &[&str]) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: "  A lamp.  ".to_string(),
            image_url: String::new(),
            price: Price::new(price.parse().unwrap()),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            is_eco_friendly: false,
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let valid = input("  Desk Lamp ", "39.999", &["LED", " led ", "", "USB"])
            .validate()
            .unwrap();
        assert_eq!(valid.name, "Desk Lamp");
        assert_eq!(valid.description, "A lamp.");
        assert_eq!(valid.price, Price::new("40.00".parse().unwrap()));
        assert_eq!(valid.tags, vec!["LED", "USB"]);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert_eq!(
            input("   ", "10", &[]).validate().unwrap_err(),
            ProductValidationError::EmptyName
        );
        assert_eq!(
            input("Lamp", "0", &[]).validate().unwrap_err(),
            ProductValidationError::NonPositivePrice
        );
        // Rounds to zero paise
        assert_eq!(
            input("Lamp", "0.004", &[]).validate().unwrap_err(),
            ProductValidationError::NonPositivePrice
        );
        assert_eq!(
            input("Lamp", "0.005", &[]).validate().unwrap().price,
            Price::from_paise(1)
        );
        assert_eq!(
            input(&"x".repeat(201), "10", &[]).validate().unwrap_err(),
            ProductValidationError::NameTooLong { max: 200 }
        );
    }

    #[test]
    fn test_input_accepts_numeric_price() {
        let parsed: ProductInput =
            serde_json::from_str(r#"{"name":"Jar","price":12.5,"isEcoFriendly":true}"#).unwrap();
        assert_eq!(parsed.price, Price::new("12.5".parse().unwrap()));
        assert!(parsed.is_eco_friendly);
        assert!(parsed.tags.is_empty());
    }

    #[test]
    fn test_text_match_covers_tags() {
        let product = Product {
            id: ProductId::new(1),
            name: "Eco-Friendly Water Bottle".to_string(),
            description: "Reusable stainless steel bottle".to_string(),
            image_url: String::new(),
            price: Price::from_rupees(30),
            tags: vec!["hydration".to_string()],
            is_eco_friendly: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(product.matches_text("water"));
        assert!(product.matches_text("stainless"));
        assert!(product.matches_text("hydra"));
        assert!(!product.matches_text("lamp"));
        assert!(product.has_tag("Hydration"));
    }
}
