//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Registration, password login, admin bootstrap
//! - `catalog` - Search, filters, tag counts, recommendations
//! - `cart` - Resolving the session cart against the catalog and pricing it
//! - `checkout` - Turning a cart into an order and crediting points
//! - `loyalty` - Tiers, rewards, the points ledger and account stats
//!
//! Services borrow the [`Database`](crate::db::Database) for one request and
//! are cheap to construct.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod loyalty;

pub use auth::{AuthError, AuthService};
pub use cart::{CartLine, CartService, CartUpdateError, CartView};
pub use catalog::{CatalogService, ProductQuery, ProductSort, TagCount};
pub use checkout::{CheckoutError, CheckoutService};
pub use loyalty::{AccountStats, LoyaltyService, Redemption, RewardOffer};
