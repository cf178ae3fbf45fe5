//! EcoStore Core - shared types and store arithmetic.
//!
//! This crate provides the types and rules used across all EcoStore
//! components:
//! - `storefront` - JSON API for the shop, accounts and admin panel
//! - `cli` - Offline tools for the catalog, quotes and loyalty tiers
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage, no HTTP. Anything here can be unit tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`pricing`] - Cart subtotal, tax, shipping and promo discounts
//! - [`loyalty`] - Points accrual, tiers and the reward catalog
//! - [`impact`] - Eco impact tallies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod impact;
pub mod loyalty;
pub mod pricing;
pub mod types;

pub use impact::EcoImpact;
pub use loyalty::{LoyaltyError, LoyaltyTier, Reward, RewardKind, TierProgress};
pub use pricing::{OrderTotals, PricedLine, PricingError, PricingPolicy, PromoCode, PromoError};
pub use types::*;
