//! User repository.

use chrono::Utc;

use ecostore_core::{Email, ProductId, UserId, UserRole};

use super::{Database, RepositoryError, UserRecord, signed};
use crate::models::{PointsEntryKind, User};

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub role: UserRole,
    /// Starting points balance, recorded as an opening ledger entry.
    pub points: u64,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> usize {
        self.db.read().await.users.len()
    }

    /// Get a user by their ID.
    pub async fn get_by_id(&self, id: UserId) -> Option<User> {
        self.db
            .read()
            .await
            .users
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| r.user.clone())
    }

    /// Get a user by their email address.
    pub async fn get_by_email(&self, email: &Email) -> Option<User> {
        self.db
            .read()
            .await
            .users
            .iter()
            .find(|r| &r.user.email == email)
            .map(|r| r.user.clone())
    }

    /// Get a user together with their password hash.
    pub async fn get_password_hash(&self, email: &Email) -> Option<(User, String)> {
        self.db
            .read()
            .await
            .users
            .iter()
            .find(|r| &r.user.email == email)
            .map(|r| (r.user.clone(), r.password_hash.clone()))
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.db.write().await;
        if tables.users.iter().any(|r| r.user.email == new.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let now = Utc::now();
        let user = User {
            id: tables.next_user_id(),
            name: new.name,
            email: new.email,
            role: new.role,
            points: new.points,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(UserRecord {
            user: user.clone(),
            password_hash: new.password_hash,
        });
        if user.points > 0 {
            tables.record_points(
                user.id,
                PointsEntryKind::Opening,
                signed(user.points),
                user.points,
                now,
            );
        }

        Ok(user)
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_password_hash(&self, id: UserId, password_hash: String) -> Result<(), RepositoryError> {
        let mut tables = self.db.write().await;
        let record = tables
            .users
            .iter_mut()
            .find(|r| r.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.password_hash = password_hash;
        record.user.updated_at = Utc::now();
        Ok(())
    }

    /// Change a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_role(&self, id: UserId, role: UserRole) -> Result<User, RepositoryError> {
        let mut tables = self.db.write().await;
        let user = tables.user_mut(id)?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    /// Record that a user viewed a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn record_view(&self, id: UserId, product: ProductId) -> Result<(), RepositoryError> {
        let mut tables = self.db.write().await;
        tables.user_mut(id)?.record_view(product);
        Ok(())
    }
}
