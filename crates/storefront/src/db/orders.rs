//! Order repository.
//!
//! Placing and cancelling orders also moves loyalty points, so both take the
//! store's write lock once and update the order, the user's balance and the
//! ledger together.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use ecostore_core::loyalty::points_for_total;
use ecostore_core::{OrderId, OrderStatus, OrderTotals, ProductId, UserId};

use super::{Database, RepositoryError, signed};
use crate::models::{Order, OrderLine, PointsEntryKind};

/// An order recorded outside checkout (demo history).
#[derive(Debug, Clone)]
pub struct ImportedOrder {
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub totals: OrderTotals,
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result of placing an order.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    /// The user's balance after the order's points were credited.
    pub points_balance: u64,
}

/// Repository for order operations.
pub struct OrderRepository<'a> {
    db: &'a Database,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Record a new order and credit `floor(total)` points to the buyer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn place(
        &self,
        user_id: UserId,
        items: Vec<OrderLine>,
        totals: OrderTotals,
    ) -> Result<PlacedOrder, RepositoryError> {
        let mut tables = self.db.write().await;
        let now = Utc::now();
        let points_earned = points_for_total(totals.total);

        let user = tables.user_mut(user_id)?;
        user.points = user.points.saturating_add(points_earned);
        user.updated_at = now;
        let points_balance = user.points;

        let order = Order {
            id: tables.next_order_id(),
            user_id,
            items,
            totals,
            points_earned,
            status: OrderStatus::Processing,
            tracking_number: None,
            created_at: now,
            updated_at: now,
        };
        tables.record_points(
            user_id,
            PointsEntryKind::Earned { order_id: order.id },
            signed(points_earned),
            points_balance,
            now,
        );
        tables.orders.push(order.clone());

        Ok(PlacedOrder {
            order,
            points_balance,
        })
    }

    /// Record a historical order without touching the buyer's balance.
    ///
    /// Imported orders never credited points, so they earn none and
    /// cancelling one later reverses nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn import(&self, imported: ImportedOrder) -> Result<Order, RepositoryError> {
        let mut tables = self.db.write().await;
        tables.user_mut(imported.user_id)?;

        let order = Order {
            id: tables.next_order_id(),
            user_id: imported.user_id,
            points_earned: 0,
            items: imported.items,
            totals: imported.totals,
            status: imported.status,
            tracking_number: imported.tracking_number,
            created_at: imported.created_at,
            updated_at: imported.created_at,
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    pub async fn get(&self, id: OrderId) -> Option<Order> {
        self.db
            .read()
            .await
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    /// A user's orders, newest first.
    pub async fn list_for_user(&self, user_id: UserId) -> Vec<Order> {
        let tables = self.db.read().await;
        let mut orders: Vec<Order> = tables
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        drop(tables);
        sort_newest_first(&mut orders);
        orders
    }

    /// Every order, newest first.
    pub async fn list_all(&self) -> Vec<Order> {
        let mut orders = self.db.read().await.orders.clone();
        sort_newest_first(&mut orders);
        orders
    }

    /// Units sold per product across orders that were not cancelled.
    pub async fn sold_quantities(&self) -> HashMap<ProductId, u64> {
        let tables = self.db.read().await;
        let mut sold: HashMap<ProductId, u64> = HashMap::new();
        for line in tables
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .flat_map(|o| &o.items)
        {
            *sold.entry(line.product_id).or_insert(0) += u64::from(line.quantity);
        }
        sold
    }

    /// Move an order to a new status.
    ///
    /// A supplied tracking number is kept only when the order ships or moves
    /// from shipped to delivered; otherwise it is ignored. Shipping assigns a
    /// tracking number when none is known. Cancelling takes back the points
    /// the order earned, never driving the balance below zero.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order, or the buyer whose
    /// points a cancellation reverses, does not exist, and
    /// `RepositoryError::Transition` if the status change is not allowed.
    /// Nothing is written when an error is returned.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<Order, RepositoryError> {
        let mut tables = self.db.write().await;
        let now = Utc::now();

        let current = tables
            .orders
            .iter()
            .find(|o| o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let previous = current.status;
        let next = previous.transition(status)?;
        let user_id = current.user_id;
        let reversal = if next == OrderStatus::Cancelled {
            current.points_earned
        } else {
            0
        };

        if reversal > 0 {
            let user = tables.user_mut(user_id)?;
            let taken = reversal.min(user.points);
            user.points -= taken;
            user.updated_at = now;
            let balance = user.points;
            tables.record_points(
                user_id,
                PointsEntryKind::Reversed { order_id: id },
                -signed(taken),
                balance,
                now,
            );
        }

        let order = tables
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(RepositoryError::NotFound)?;
        order.status = next;
        if let Some(tracking) = tracking_number.filter(|_| accepts_tracking(previous, next)) {
            order.tracking_number = Some(tracking);
        } else if next == OrderStatus::Shipped && order.tracking_number.is_none() {
            order.tracking_number = Some(generate_tracking_number(order.id, now));
        }
        order.updated_at = now;

        Ok(order.clone())
    }
}

/// Whether an admin-supplied tracking number belongs on this move.
const fn accepts_tracking(from: OrderStatus, to: OrderStatus) -> bool {
    matches!(
        (from, to),
        (_, OrderStatus::Shipped) | (OrderStatus::Shipped, OrderStatus::Delivered)
    )
}

fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

/// `TRK` + date + zero-padded order id, e.g. `TRK202401250003`.
fn generate_tracking_number(id: OrderId, at: DateTime<Utc>) -> String {
    format!("TRK{}{:04}", at.format("%Y%m%d"), id.as_i32())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecostore_core::{Email, Price, PricedLine, PricingPolicy, UserRole};

    use super::*;
    use crate::db::users::NewUser;
    use crate::db::{PointsRepository, UserRepository};

    async fn customer(db: &Database, points: u64) -> UserId {
        UserRepository::new(db)
            .create(NewUser {
                name: "Ravi".to_string(),
                email: Email::parse("ravi@example.com").unwrap(),
                password_hash: "hash".to_string(),
                role: UserRole::Customer,
                points,
            })
            .await
            .unwrap()
            .id
    }

    fn line(id: i32, price: i64, quantity: u32, eco: bool) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            unit_price: Price::from_rupees(price),
            quantity,
            is_eco_friendly: eco,
        }
    }

    fn totals(items: &[OrderLine]) -> OrderTotals {
        let lines: Vec<PricedLine> = items.iter().map(OrderLine::priced).collect();
        PricingPolicy::default().quote(&lines, None)
    }

    #[tokio::test]
    async fn test_place_credits_points_atomically() {
        let db = Database::new();
        let user_id = customer(&db, 150).await;
        let items = vec![line(1, 100, 2, true)];
        // 200 + 99 shipping + 36 tax = 335
        let placed = OrderRepository::new(&db)
            .place(user_id, items.clone(), totals(&items))
            .await
            .unwrap();

        assert_eq!(placed.order.points_earned, 335);
        assert_eq!(placed.points_balance, 485);
        assert_eq!(placed.order.status, OrderStatus::Processing);

        let user = UserRepository::new(&db).get_by_id(user_id).await.unwrap();
        assert_eq!(user.points, 485);

        let history = PointsRepository::new(&db).history(user_id).await;
        assert_eq!(history.first().unwrap().delta, 335);
        assert_eq!(history.first().unwrap().balance_after, 485);
    }

    #[tokio::test]
    async fn test_place_for_unknown_user() {
        let db = Database::new();
        let items = vec![line(1, 100, 1, true)];
        let result = OrderRepository::new(&db)
            .place(UserId::new(7), items.clone(), totals(&items))
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_ship_assigns_tracking_and_cancel_reverses_points() {
        let db = Database::new();
        let user_id = customer(&db, 0).await;
        let repo = OrderRepository::new(&db);
        let items = vec![line(1, 100, 1, true)];
        let placed = repo.place(user_id, items.clone(), totals(&items)).await.unwrap();

        let shipped = repo
            .update_status(placed.order.id, OrderStatus::Shipped, None)
            .await
            .unwrap();
        assert!(shipped.tracking_number.unwrap().starts_with("TRK"));

        let cancelled = repo
            .update_status(placed.order.id, OrderStatus::Cancelled, None)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let user = UserRepository::new(&db).get_by_id(user_id).await.unwrap();
        assert_eq!(user.points, 0);

        let history = PointsRepository::new(&db).history(user_id).await;
        assert_eq!(
            history.first().unwrap().kind,
            PointsEntryKind::Reversed {
                order_id: placed.order.id
            }
        );

        assert!(matches!(
            repo.update_status(placed.order.id, OrderStatus::Shipped, None)
                .await,
            Err(RepositoryError::Transition(_))
        ));
    }

    #[tokio::test]
    async fn test_sold_quantities_skip_cancelled() {
        let db = Database::new();
        let user_id = customer(&db, 0).await;
        let repo = OrderRepository::new(&db);

        let first = vec![line(1, 10, 2, true), line(2, 10, 1, false)];
        repo.place(user_id, first.clone(), totals(&first)).await.unwrap();
        let second = vec![line(1, 10, 3, true)];
        let cancelled = repo.place(user_id, second.clone(), totals(&second)).await.unwrap();
        repo.update_status(cancelled.order.id, OrderStatus::Cancelled, None)
            .await
            .unwrap();

        let sold = repo.sold_quantities().await;
        assert_eq!(sold.get(&ProductId::new(1)), Some(&2));
        assert_eq!(sold.get(&ProductId::new(2)), Some(&1));
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let db = Database::new();
        let user_id = customer(&db, 0).await;
        let repo = OrderRepository::new(&db);
        let items = vec![line(1, 10, 1, true)];
        let older = repo
            .import(ImportedOrder {
                user_id,
                items: items.clone(),
                totals: totals(&items),
                status: OrderStatus::Delivered,
                tracking_number: None,
                created_at: Utc::now() - chrono::Duration::days(30),
            })
            .await
            .unwrap();
        let newer = repo.place(user_id, items.clone(), totals(&items)).await.unwrap();

        let ids: Vec<OrderId> = repo.list_for_user(user_id).await.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![newer.order.id, older.id]);
        assert_eq!(repo.list_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelling_imported_order_keeps_balance() {
        let db = Database::new();
        let user_id = customer(&db, 150).await;
        let repo = OrderRepository::new(&db);
        let items = vec![line(1, 500, 1, true)];
        let imported = repo
            .import(ImportedOrder {
                user_id,
                items: items.clone(),
                totals: totals(&items),
                status: OrderStatus::Shipped,
                tracking_number: Some("TRK202401270001".to_string()),
                created_at: Utc::now() - chrono::Duration::days(10),
            })
            .await
            .unwrap();
        assert_eq!(imported.points_earned, 0);

        let cancelled = repo
            .update_status(imported.id, OrderStatus::Cancelled, None)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        let user = UserRepository::new(&db).get_by_id(user_id).await.unwrap();
        assert_eq!(user.points, 150);
        assert!(PointsRepository::new(&db).history(user_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_supplied_tracking_only_kept_when_shipping() {
        let db = Database::new();
        let user_id = customer(&db, 0).await;
        let repo = OrderRepository::new(&db);
        let items = vec![line(1, 100, 1, true)];

        let cancelled = repo.place(user_id, items.clone(), totals(&items)).await.unwrap();
        let order = repo
            .update_status(
                cancelled.order.id,
                OrderStatus::Cancelled,
                Some("BLUEDART-1".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(order.tracking_number, None);

        let shipped = repo.place(user_id, items.clone(), totals(&items)).await.unwrap();
        let order = repo
            .update_status(
                shipped.order.id,
                OrderStatus::Shipped,
                Some("BLUEDART-2".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(order.tracking_number.as_deref(), Some("BLUEDART-2"));

        let order = repo
            .update_status(
                shipped.order.id,
                OrderStatus::Delivered,
                Some("BLUEDART-3".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(order.tracking_number.as_deref(), Some("BLUEDART-3"));
    }

    #[tokio::test]
    async fn test_cancel_with_missing_buyer_changes_nothing() {
        let db = Database::new();
        let items = vec![line(1, 100, 1, true)];
        let orphan = Order {
            id: OrderId::new(1),
            user_id: UserId::new(42),
            items: items.clone(),
            totals: totals(&items),
            points_earned: 199,
            status: OrderStatus::Processing,
            tracking_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        db.write().await.orders.push(orphan.clone());

        let repo = OrderRepository::new(&db);
        let result = repo
            .update_status(orphan.id, OrderStatus::Cancelled, None)
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));

        let stored = repo.get(orphan.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::Processing);
        assert_eq!(stored.updated_at, orphan.updated_at);
    }
}
