//! Loyalty points ledger.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ecostore_core::{OrderId, PointsEntryId, RewardId, UserId};

/// Why a balance changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointsEntryKind {
    /// Balance carried into the store when the account was created.
    Opening,
    /// Points credited for placing an order.
    #[serde(rename_all = "camelCase")]
    Earned { order_id: OrderId },
    /// Points spent on a reward.
    #[serde(rename_all = "camelCase")]
    Redeemed { reward_id: RewardId },
    /// Points taken back when an order was cancelled.
    #[serde(rename_all = "camelCase")]
    Reversed { order_id: OrderId },
}

/// One change to a user's points balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsEntry {
    pub id: PointsEntryId,
    pub user_id: UserId,
    #[serde(flatten)]
    pub kind: PointsEntryKind,
    /// Signed change in points.
    pub delta: i64,
    pub balance_after: u64,
    pub created_at: DateTime<Utc>,
}
