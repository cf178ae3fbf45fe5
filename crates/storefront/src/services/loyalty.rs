//! Loyalty points, rewards and account stats.

use serde::Serialize;
use tracing::info;

use ecostore_core::loyalty::{self, Reward};
use ecostore_core::{EcoImpact, LoyaltyError, LoyaltyTier, OrderStatus, Price, RewardId, TierProgress, UserId};

use crate::db::{Database, OrderRepository, PointsRepository, RepositoryError, UserRepository};
use crate::models::{PointsEntry, User};

/// A reward and whether the user can afford it right now.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardOffer {
    #[serde(flatten)]
    pub reward: Reward,
    pub can_redeem: bool,
}

/// Outcome of spending points on a reward.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub reward: Reward,
    pub points_spent: u64,
    pub points_balance: u64,
}

/// Account overview shown on the profile page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    /// Sum of order totals, cancelled orders excluded.
    pub total_spent: Price,
    pub total_orders: usize,
    pub points: u64,
    pub tier: LoyaltyTier,
    pub eco_impact: EcoImpact,
}

pub struct LoyaltyService<'a> {
    users: UserRepository<'a>,
    orders: OrderRepository<'a>,
    points: PointsRepository<'a>,
}

impl<'a> LoyaltyService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db),
            orders: OrderRepository::new(db),
            points: PointsRepository::new(db),
        }
    }

    async fn user(&self, user_id: UserId) -> Result<User, RepositoryError> {
        self.users
            .get_by_id(user_id)
            .await
            .ok_or(RepositoryError::NotFound)
    }

    /// Current tier and the distance to the next one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn summary(&self, user_id: UserId) -> Result<TierProgress, RepositoryError> {
        let user = self.user(user_id).await?;
        Ok(TierProgress::for_points(user.points))
    }

    /// The reward catalog, flagged with what the user can afford.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn rewards(&self, user_id: UserId) -> Result<Vec<RewardOffer>, RepositoryError> {
        let user = self.user(user_id).await?;
        Ok(loyalty::rewards()
            .iter()
            .map(|reward| RewardOffer {
                reward: *reward,
                can_redeem: user.points >= reward.cost,
            })
            .collect())
    }

    /// Spend points on a reward.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Loyalty` for an unknown reward or a balance
    /// that cannot cover it, and `RepositoryError::NotFound` for an unknown
    /// user.
    pub async fn redeem(&self, user_id: UserId, reward_id: RewardId) -> Result<Redemption, RepositoryError> {
        let reward = loyalty::reward(reward_id).ok_or(LoyaltyError::UnknownReward(reward_id))?;
        let entry = self.points.redeem(user_id, reward).await?;

        info!(
            user_id = %user_id,
            reward_id = %reward.id,
            balance = entry.balance_after,
            "Reward redeemed"
        );
        Ok(Redemption {
            reward: *reward,
            points_spent: reward.cost,
            points_balance: entry.balance_after,
        })
    }

    /// Every balance change for the user, newest first.
    pub async fn ledger(&self, user_id: UserId) -> Vec<PointsEntry> {
        self.points.history(user_id).await
    }

    /// Spend, order count, tier and eco impact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn stats(&self, user_id: UserId) -> Result<AccountStats, RepositoryError> {
        let user = self.user(user_id).await?;
        let orders = self.orders.list_for_user(user_id).await;
        let counted = || orders.iter().filter(|o| o.status != OrderStatus::Cancelled);

        Ok(AccountStats {
            total_spent: counted().map(|o| o.totals.total).sum(),
            total_orders: orders.len(),
            points: user.points,
            tier: LoyaltyTier::for_points(user.points),
            eco_impact: EcoImpact::from_orders(counted().map(crate::models::Order::eco_lines)),
        })
    }
}
