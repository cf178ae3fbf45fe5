//! Session-related types.
//!
//! Types stored in the session for authentication state and the visitor's
//! cart and wishlist.

use serde::{Deserialize, Serialize};

use ecostore_core::{Email, UserId, UserRole};

use super::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// role is re-checked against the store for admin requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's store ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role at login time.
    pub role: UserRole,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the visitor's cart (items and applied promo code).
    pub const CART: &str = "cart";

    /// Key for the visitor's wishlist.
    pub const WISHLIST: &str = "wishlist";
}
