//! In-memory data store for the storefront.
//!
//! # Tables
//!
//! - `products` - Catalog
//! - `users` - Accounts with their argon2 password hashes
//! - `orders` - Placed orders with line snapshots
//! - `points` - Loyalty points ledger
//!
//! Each table is a flat `Vec` behind one [`tokio::sync::RwLock`]. Ids come
//! from per-table counters and are never reused, even after a delete.
//! Operations that touch more than one table (placing an order credits
//! points and writes a ledger entry) hold the write lock for the whole
//! change, so readers never observe half of it.
//!
//! Nothing is persisted; a restart starts from an empty store or the demo
//! seed (see [`seed`]).

pub mod orders;
pub mod points;
pub mod products;
pub mod seed;
pub mod users;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ecostore_core::{LoyaltyError, OrderId, PointsEntryId, ProductId, StatusTransitionError, UserId};

use crate::models::{Order, PointsEntry, PointsEntryKind, Product, User};

pub use orders::OrderRepository;
pub use points::PointsRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Order status change not allowed.
    #[error(transparent)]
    Transition(#[from] StatusTransitionError),

    /// Points balance cannot cover the request.
    #[error(transparent)]
    Loyalty(#[from] LoyaltyError),
}

/// A user row: the account plus its password hash.
#[derive(Debug, Clone)]
struct UserRecord {
    user: User,
    password_hash: String,
}

/// Next-id counters, one per table.
#[derive(Debug)]
struct Sequences {
    product: i32,
    user: i32,
    order: i32,
    points: i32,
}

impl Default for Sequences {
    fn default() -> Self {
        Self {
            product: 1,
            user: 1,
            order: 1,
            points: 1,
        }
    }
}

fn take(counter: &mut i32) -> i32 {
    let id = *counter;
    *counter += 1;
    id
}

/// All tables. Only reachable through a [`Database`] lock guard.
#[derive(Debug, Default)]
struct Tables {
    products: Vec<Product>,
    users: Vec<UserRecord>,
    orders: Vec<Order>,
    points: Vec<PointsEntry>,
    sequences: Sequences,
}

impl Tables {
    fn next_product_id(&mut self) -> ProductId {
        ProductId::new(take(&mut self.sequences.product))
    }

    fn next_user_id(&mut self) -> UserId {
        UserId::new(take(&mut self.sequences.user))
    }

    fn next_order_id(&mut self) -> OrderId {
        OrderId::new(take(&mut self.sequences.order))
    }

    fn user_mut(&mut self, id: UserId) -> Result<&mut User, RepositoryError> {
        self.users
            .iter_mut()
            .map(|record| &mut record.user)
            .find(|user| user.id == id)
            .ok_or(RepositoryError::NotFound)
    }

    /// Append a ledger entry.
    fn record_points(
        &mut self,
        user_id: UserId,
        kind: PointsEntryKind,
        delta: i64,
        balance_after: u64,
        at: DateTime<Utc>,
    ) -> PointsEntry {
        let entry = PointsEntry {
            id: PointsEntryId::new(take(&mut self.sequences.points)),
            user_id,
            kind,
            delta,
            balance_after,
            created_at: at,
        };
        self.points.push(entry.clone());
        entry
    }
}

/// The store handle shared by all requests.
#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

impl Database {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}

/// Points expressed as a ledger delta.
fn signed(points: u64) -> i64 {
    i64::try_from(points).unwrap_or(i64::MAX)
}
