//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ecostore_core::{Email, ProductId, UserId, UserRole};

/// A store account.
///
/// The password hash lives only in the store's user table and is never part
/// of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    pub role: UserRole,
    /// Current loyalty points balance.
    pub points: u64,
    /// Recently viewed products, most recent first.
    pub history: Vec<ProductId>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// How many viewed products are remembered.
    pub const HISTORY_LIMIT: usize = 20;

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Move `product` to the front of the view history.
    pub fn record_view(&mut self, product: ProductId) {
        self.history.retain(|id| *id != product);
        self.history.insert(0, product);
        self.history.truncate(Self::HISTORY_LIMIT);
    }
}
