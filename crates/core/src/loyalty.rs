//! Loyalty points, tiers and rewards.
//!
//! Shoppers earn one point per whole rupee of an order's total. The running
//! balance places them in a tier and can be spent on rewards from a fixed
//! catalog.

use serde::{Deserialize, Serialize};

use crate::types::{Price, RewardId};

/// Points earned for an order with the given total: `floor(total)`.
#[must_use]
pub fn points_for_total(total: Price) -> u64 {
    total.whole_rupees()
}

// =============================================================================
// Tiers
// =============================================================================

/// Loyalty tier derived from a points balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    /// All tiers, lowest first.
    pub const ALL: [Self; 4] = [Self::Bronze, Self::Silver, Self::Gold, Self::Platinum];

    /// Minimum balance for this tier.
    #[must_use]
    pub const fn threshold(self) -> u64 {
        match self {
            Self::Bronze => 0,
            Self::Silver => 200,
            Self::Gold => 500,
            Self::Platinum => 1000,
        }
    }

    /// Tier for a balance.
    #[must_use]
    pub fn for_points(points: u64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|tier| points >= tier.threshold())
            .unwrap_or(Self::Bronze)
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Bronze => Some(Self::Silver),
            Self::Silver => Some(Self::Gold),
            Self::Gold => Some(Self::Platinum),
            Self::Platinum => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }
}

impl std::fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a balance sits relative to the next tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub points: u64,
    pub tier: LoyaltyTier,
    pub next_tier: Option<LoyaltyTier>,
    /// Points still needed to reach `next_tier` (zero at the top tier).
    pub points_to_next: u64,
    /// `points / next threshold` as a whole percentage, capped at 100.
    pub progress_percent: u8,
}

impl TierProgress {
    #[must_use]
    pub fn for_points(points: u64) -> Self {
        let tier = LoyaltyTier::for_points(points);
        let next_tier = tier.next();
        let (points_to_next, progress_percent) = next_tier.map_or((0, 100), |next| {
            let target = next.threshold();
            let percent = points.saturating_mul(100) / target;
            (
                target.saturating_sub(points),
                u8::try_from(percent.min(100)).unwrap_or(100),
            )
        });
        Self {
            points,
            tier,
            next_tier,
            points_to_next,
            progress_percent,
        }
    }
}

// =============================================================================
// Rewards
// =============================================================================

/// What a reward grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    Discount,
    Shipping,
    Product,
    Eco,
}

/// An entry in the reward catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub id: RewardId,
    pub title: &'static str,
    pub description: &'static str,
    pub cost: u64,
    pub kind: RewardKind,
}

static REWARDS: [Reward; 4] = [
    Reward {
        id: RewardId::new(1),
        title: "10% Off Next Order",
        description: "Get 10% discount on your next purchase",
        cost: 100,
        kind: RewardKind::Discount,
    },
    Reward {
        id: RewardId::new(2),
        title: "Free Shipping",
        description: "Free shipping on your next order",
        cost: 50,
        kind: RewardKind::Shipping,
    },
    Reward {
        id: RewardId::new(3),
        title: "Mystery Eco Box",
        description: "Surprise box of eco-friendly products",
        cost: 500,
        kind: RewardKind::Product,
    },
    Reward {
        id: RewardId::new(4),
        title: "Plant a Tree",
        description: "We'll plant a tree in your name",
        cost: 200,
        kind: RewardKind::Eco,
    },
];

/// The full reward catalog.
#[must_use]
pub fn rewards() -> &'static [Reward] {
    &REWARDS
}

/// Look up a reward by id.
#[must_use]
pub fn reward(id: RewardId) -> Option<&'static Reward> {
    REWARDS.iter().find(|reward| reward.id == id)
}

/// Errors from spending points.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoyaltyError {
    #[error("Not enough points: need {needed}, have {available}")]
    InsufficientPoints { needed: u64, available: u64 },
    #[error("Reward not found")]
    UnknownReward(RewardId),
}

/// Spend points on a reward, returning the new balance.
///
/// # Errors
///
/// Returns [`LoyaltyError::InsufficientPoints`] when `balance` is below the
/// reward's cost. The balance is never driven negative.
pub const fn redeem(balance: u64, reward: &Reward) -> Result<u64, LoyaltyError> {
    match balance.checked_sub(reward.cost) {
        Some(remaining) => Ok(remaining),
        None => Err(LoyaltyError::InsufficientPoints {
            needed: reward.cost,
            available: balance,
        }),
    }
}
