//! Loyalty points ledger repository.

use chrono::Utc;

use ecostore_core::loyalty::{self, Reward};
use ecostore_core::UserId;

use super::{Database, RepositoryError, signed};
use crate::models::{PointsEntry, PointsEntryKind};

/// Repository for points balance changes that are not tied to an order.
pub struct PointsRepository<'a> {
    db: &'a Database,
}

impl<'a> PointsRepository<'a> {
    /// Create a new points repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// A user's ledger, newest first.
    pub async fn history(&self, user_id: UserId) -> Vec<PointsEntry> {
        let tables = self.db.read().await;
        tables
            .points
            .iter()
            .rev()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Spend points on a reward.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist, or
    /// `RepositoryError::Loyalty` if the balance cannot cover the reward.
    pub async fn redeem(&self, user_id: UserId, reward: &Reward) -> Result<PointsEntry, RepositoryError> {
        let mut tables = self.db.write().await;
        let now = Utc::now();

        let user = tables.user_mut(user_id)?;
        let balance = loyalty::redeem(user.points, reward)?;
        user.points = balance;
        user.updated_at = now;

        Ok(tables.record_points(
            user_id,
            PointsEntryKind::Redeemed {
                reward_id: reward.id,
            },
            -signed(reward.cost),
            balance,
            now,
        ))
    }
}
