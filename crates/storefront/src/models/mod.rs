//! Domain models for the storefront.
//!
//! Records held in the in-memory store (`product`, `user`, `order`,
//! `points`) and the per-visitor state kept in the session (`cart`,
//! `wishlist`, `session`).

pub mod cart;
pub mod order;
pub mod points;
pub mod product;
pub mod session;
pub mod user;
pub mod wishlist;

pub use cart::{Cart, CartError, CartItem};
pub use order::{Order, OrderLine, SoldProduct};
pub use points::{PointsEntry, PointsEntryKind};
pub use product::{Product, ProductInput, ProductValidationError};
pub use session::CurrentUser;
pub use user::User;
pub use wishlist::Wishlist;
