//! Demo data: the starter catalog, a demo shopper and their order history.
//!
//! Demo login: `demo@example.com` / `demo123`.

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;
use tracing::info;

use ecostore_core::{Email, OrderStatus, Price, PricedLine, PricingPolicy, ProductId, UserRole};

use super::orders::ImportedOrder;
use super::users::NewUser;
use super::{Database, OrderRepository, ProductRepository, RepositoryError, UserRepository};
use crate::models::{OrderLine, Product, ProductInput};
use crate::services::auth::{AuthError, hash_password};

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_NAME: &str = "Demo User";
pub const DEMO_POINTS: u64 = 150;

/// Errors while loading demo data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("seed auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("invalid seed data: {0}")]
    Invalid(String),
}

/// What was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub users: usize,
    pub orders: usize,
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    image_url: &'static str,
    price_paise: i64,
    tags: &'static [&'static str],
    is_eco_friendly: bool,
}

const CATALOG: &[SeedProduct] = &[
    SeedProduct {
        name: "Eco-Friendly Water Bottle",
        description: "Reusable stainless steel water bottle that keeps drinks cold for 24 hours and hot for 12 hours. Perfect for daily hydration and reducing plastic waste.",
        image_url: "https://images.unsplash.com/photo-1602143407151-7111542de6e8?w=400",
        price_paise: 2999,
        tags: &["eco-friendly", "reusable", "stainless steel", "hydration"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Organic Cotton T-Shirt",
        description: "Soft, comfortable t-shirt made from 100% organic cotton. Available in multiple colors. Ethically sourced and fair trade certified.",
        image_url: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab?w=400",
        price_paise: 2499,
        tags: &["organic", "cotton", "clothing", "fair trade"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Bamboo Phone Case",
        description: "Protective phone case made from sustainable bamboo. Compatible with most phone models. Naturally antimicrobial and biodegradable.",
        image_url: "https://images.unsplash.com/photo-1556656793-08538906a9f8?w=400",
        price_paise: 1999,
        tags: &["bamboo", "phone case", "sustainable", "biodegradable"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Solar Power Bank",
        description: "Portable solar-powered charger for your devices. Perfect for outdoor adventures. 20,000mAh capacity with fast charging technology.",
        image_url: "https://images.unsplash.com/photo-1609091839311-d5365f9ff1c5?w=400",
        price_paise: 4999,
        tags: &["solar", "power bank", "portable", "outdoor"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Recycled Notebook",
        description: "High-quality notebook made from 100% recycled paper. Perfect for journaling or note-taking. Includes plantable seed paper bookmark.",
        image_url: "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?w=400",
        price_paise: 1299,
        tags: &["recycled", "notebook", "paper", "plantable"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "LED Desk Lamp",
        description: "Energy-efficient LED desk lamp with adjustable brightness and color temperature. USB charging port included for convenience.",
        image_url: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400",
        price_paise: 3999,
        tags: &["LED", "desk lamp", "energy efficient", "USB"],
        is_eco_friendly: false,
    },
    SeedProduct {
        name: "Reusable Food Wraps",
        description: "Set of 3 beeswax food wraps in different sizes. Perfect alternative to plastic wrap. Keeps food fresh naturally.",
        image_url: "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?w=400",
        price_paise: 1899,
        tags: &["beeswax", "food wrap", "reusable", "kitchen"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Bamboo Toothbrush Set",
        description: "Pack of 4 biodegradable bamboo toothbrushes with soft bristles. Plastic-free oral care for the whole family.",
        image_url: "https://images.unsplash.com/photo-1607613009820-a29f7bb81c04?w=400",
        price_paise: 1599,
        tags: &["bamboo", "toothbrush", "biodegradable", "oral care"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Organic Hemp Backpack",
        description: "Durable backpack made from organic hemp fiber. Water-resistant and perfect for daily commute or hiking adventures.",
        image_url: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=400",
        price_paise: 7999,
        tags: &["hemp", "backpack", "organic", "water-resistant"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Stainless Steel Lunch Box",
        description: "Leak-proof stainless steel lunch container with compartments. BPA-free and dishwasher safe. Perfect for meal prep.",
        image_url: "https://images.unsplash.com/photo-1578662996442-48f60103fc96?w=400",
        price_paise: 3499,
        tags: &["stainless steel", "lunch box", "BPA-free", "meal prep"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Eco-Friendly Yoga Mat",
        description: "Non-toxic yoga mat made from natural rubber and cork. Provides excellent grip and cushioning for all yoga practices.",
        image_url: "https://images.unsplash.com/photo-1544367567-0f2fcb009e0b?w=400",
        price_paise: 6899,
        tags: &["yoga", "natural rubber", "cork", "non-toxic"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Seed Starter Kit",
        description: "Complete kit for growing your own herbs and vegetables. Includes organic seeds, biodegradable pots, and growing guide.",
        image_url: "https://images.unsplash.com/photo-1416879595882-3373a0480b5b?w=400",
        price_paise: 2299,
        tags: &["seeds", "gardening", "organic", "herbs"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Wireless Charging Pad",
        description: "Fast wireless charging pad compatible with all Qi-enabled devices. Made with recycled materials and energy-efficient design.",
        image_url: "https://images.unsplash.com/photo-1586953208448-b95a79798f07?w=400",
        price_paise: 4599,
        tags: &["wireless charging", "recycled materials", "Qi-enabled", "fast charging"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Compostable Phone Case",
        description: "Fully compostable phone case made from plant-based materials. Breaks down naturally in 6 months when composted.",
        image_url: "https://images.unsplash.com/photo-1601593346740-925612772716?w=400",
        price_paise: 2799,
        tags: &["compostable", "plant-based", "phone case", "biodegradable"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Sustainable Sneakers",
        description: "Comfortable sneakers made from recycled ocean plastic and organic cotton. Stylish and environmentally conscious footwear.",
        image_url: "https://images.unsplash.com/photo-1549298916-b41d501d3772?w=400",
        price_paise: 8999,
        tags: &["sneakers", "recycled plastic", "ocean plastic", "footwear"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Glass Water Bottles Set",
        description: "Set of 2 borosilicate glass water bottles with silicone sleeves. Heat-resistant and perfect for hot or cold beverages.",
        image_url: "https://images.unsplash.com/photo-1523362628745-0c100150b504?w=400",
        price_paise: 4299,
        tags: &["glass", "water bottle", "borosilicate", "heat-resistant"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Organic Cotton Tote Bag",
        description: "Spacious tote bag made from certified organic cotton. Perfect for grocery shopping and daily errands. Machine washable.",
        image_url: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=400",
        price_paise: 1699,
        tags: &["organic cotton", "tote bag", "shopping", "machine washable"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Solar Garden Lights",
        description: "Set of 6 solar-powered LED garden lights. Automatic on/off with dusk sensor. Weather-resistant and easy installation.",
        image_url: "https://images.unsplash.com/photo-1558618666-fcd25c85cd64?w=400",
        price_paise: 3599,
        tags: &["solar", "garden lights", "LED", "weather-resistant"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Bamboo Cutting Board Set",
        description: "Set of 3 bamboo cutting boards in different sizes. Naturally antimicrobial and knife-friendly. Includes hanging loops.",
        image_url: "https://images.unsplash.com/photo-1556909114-f6e7ad7d3136?w=400",
        price_paise: 2899,
        tags: &["bamboo", "cutting board", "antimicrobial", "kitchen"],
        is_eco_friendly: true,
    },
    SeedProduct {
        name: "Eco-Friendly Cleaning Kit",
        description: "Complete cleaning kit with plant-based cleaners and reusable microfiber cloths. Safe for family and pets.",
        image_url: "https://images.unsplash.com/photo-1563453392212-326f5e854473?w=400",
        price_paise: 3199,
        tags: &["cleaning", "plant-based", "microfiber", "family-safe"],
        is_eco_friendly: true,
    },
];

/// Demo order history: (date, status, tracking number, [(product position, quantity)]).
/// Product positions are 1-based into the catalog, matching the seeded ids.
type SeedOrder = ((i32, u32, u32), OrderStatus, Option<&'static str>, &'static [(i32, u32)]);

const ORDERS: &[SeedOrder] = &[
    ((2024, 1, 15), OrderStatus::Delivered, Some("TRK202401200001"), &[(1, 2), (3, 1)]),
    ((2024, 1, 20), OrderStatus::Delivered, Some("TRK202401240002"), &[(2, 3), (4, 1)]),
    ((2024, 1, 25), OrderStatus::Shipped, Some("TRK202401270003"), &[(5, 2), (1, 1)]),
];

/// The starter catalog as product inputs, in id order.
#[must_use]
pub fn demo_products() -> Vec<ProductInput> {
    CATALOG
        .iter()
        .map(|p| ProductInput {
            name: p.name.to_string(),
            description: p.description.to_string(),
            image_url: p.image_url.to_string(),
            price: Price::from_paise(p.price_paise),
            tags: p.tags.iter().map(|t| (*t).to_string()).collect(),
            is_eco_friendly: p.is_eco_friendly,
        })
        .collect()
}

/// Load the demo catalog, user and orders into an empty store.
///
/// Order totals are priced with `pricing`, so the history matches what
/// checkout would charge today.
///
/// # Errors
///
/// Returns `SeedError` if the store already holds the demo user or the demo
/// password cannot be hashed.
pub async fn load_demo(db: &Database, pricing: &PricingPolicy) -> Result<SeedSummary, SeedError> {
    let products = ProductRepository::new(db);
    let mut catalog: Vec<Product> = Vec::with_capacity(CATALOG.len());
    for input in demo_products() {
        let input = input
            .validate()
            .map_err(|e| SeedError::Invalid(e.to_string()))?;
        catalog.push(products.create(input).await);
    }

    let email = Email::parse(DEMO_EMAIL).map_err(|e| SeedError::Invalid(e.to_string()))?;
    let demo = UserRepository::new(db)
        .create(NewUser {
            name: DEMO_NAME.to_string(),
            email,
            password_hash: hash_password(DEMO_PASSWORD)?,
            role: UserRole::Customer,
            points: DEMO_POINTS,
        })
        .await?;

    let orders = OrderRepository::new(db);
    for ((year, month, day), status, tracking, lines) in ORDERS {
        let items = lines
            .iter()
            .map(|(position, quantity)| {
                catalog
                    .iter()
                    .find(|p| p.id == ProductId::new(*position))
                    .map(|p| OrderLine::from_product(p, *quantity))
                    .ok_or_else(|| SeedError::Invalid(format!("no product at position {position}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let priced: Vec<PricedLine> = items.iter().map(OrderLine::priced).collect();
        orders
            .import(ImportedOrder {
                user_id: demo.id,
                totals: pricing.quote(&priced, None),
                items,
                status: *status,
                tracking_number: tracking.map(str::to_string),
                created_at: seed_date(*year, *month, *day),
            })
            .await?;
    }

    let summary = SeedSummary {
        products: catalog.len(),
        users: 1,
        orders: ORDERS.len(),
    };
    info!(
        products = summary.products,
        orders = summary.orders,
        demo_user = DEMO_EMAIL,
        "Loaded demo data"
    );
    Ok(summary)
}

fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 10, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::PointsRepository;

    #[test]
    fn test_catalog_shape() {
        let products = demo_products();
        assert_eq!(products.len(), 20);
        assert_eq!(products.iter().filter(|p| !p.is_eco_friendly).count(), 1);
        assert_eq!(products.first().unwrap().name, "Eco-Friendly Water Bottle");
        assert_eq!(products.first().unwrap().price, Price::from_paise(2999));
    }

    #[tokio::test]
    async fn test_load_demo() {
        let db = Database::new();
        let summary = load_demo(&db, &PricingPolicy::default()).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                products: 20,
                users: 1,
                orders: 3
            }
        );

        let lamp = ProductRepository::new(&db).get(ProductId::new(6)).await.unwrap();
        assert_eq!(lamp.name, "LED Desk Lamp");
        assert!(!lamp.is_eco_friendly);

        let email = Email::parse(DEMO_EMAIL).unwrap();
        let demo = UserRepository::new(&db).get_by_email(&email).await.unwrap();
        assert_eq!(demo.points, DEMO_POINTS);

        // Historical orders do not move the balance.
        let history = PointsRepository::new(&db).history(demo.id).await;
        assert_eq!(history.len(), 1);

        let orders = OrderRepository::new(&db).list_for_user(demo.id).await;
        assert_eq!(orders.len(), 3);
        // Newest: 2 notebooks + 1 bottle = 25.98 + 29.99
        let newest = orders.first().unwrap();
        assert_eq!(newest.totals.subtotal, Price::from_paise(5597));
        assert_eq!(newest.status, OrderStatus::Shipped);
    }

    #[tokio::test]
    async fn test_load_twice_conflicts() {
        let db = Database::new();
        load_demo(&db, &PricingPolicy::default()).await.unwrap();
        assert!(matches!(
            load_demo(&db, &PricingPolicy::default()).await,
            Err(SeedError::Repository(RepositoryError::Conflict(_)))
        ));
    }

    #[tokio::test]
    async fn test_cancelling_seeded_order_keeps_demo_points() {
        let db = Database::new();
        load_demo(&db, &PricingPolicy::default()).await.unwrap();
        let email = Email::parse(DEMO_EMAIL).unwrap();
        let demo = UserRepository::new(&db).get_by_email(&email).await.unwrap();

        let orders = OrderRepository::new(&db);
        let shipped = orders.list_for_user(demo.id).await.first().unwrap().clone();
        assert_eq!(shipped.status, OrderStatus::Shipped);
        orders
            .update_status(shipped.id, OrderStatus::Cancelled, None)
            .await
            .unwrap();

        let demo = UserRepository::new(&db).get_by_id(demo.id).await.unwrap();
        assert_eq!(demo.points, DEMO_POINTS);
        assert_eq!(PointsRepository::new(&db).history(demo.id).await.len(), 1);
    }
}
