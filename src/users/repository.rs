//! User repository: typed access to the user table.

use async_trait::async_trait;

use crate::users::error::UserError;
use crate::users::model::User;
use crate::users::store::{StoreError, UserRow, UserStore};

/// Persistence operations the user service needs.
///
/// Object-safe so the service can hold `Arc<dyn UserRepository>`.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, unpaginated, in the store's natural order.
    async fn list(&self) -> Result<Vec<User>, UserError>;

    /// One user, or `UserError::NotFound`.
    async fn get_by_id(&self, id: &str) -> Result<User, UserError>;

    /// Persist a fully populated record. Fails on a duplicate id.
    async fn create(&self, user: &User) -> Result<(), UserError>;

    /// Overwrite email, name and `updated_at` of an existing record.
    async fn update(&self, user: &User) -> Result<(), UserError>;

    /// Remove a record. Deleting an unknown id is not an error.
    async fn delete(&self, id: &str) -> Result<(), UserError>;
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        UserRow {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgUserRepository {
    store: UserStore,
}

impl PgUserRepository {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserError> {
        let rows = self.store.select_all().await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<User, UserError> {
        self.store
            .select_by_id(id)
            .await?
            .map(User::from)
            .ok_or_else(|| UserError::not_found(id))
    }

    async fn create(&self, user: &User) -> Result<(), UserError> {
        match self.store.insert(&UserRow::from(user)).await {
            Ok(()) => Ok(()),
            Err(StoreError::UniqueViolation(_)) => Err(UserError::already_exists(&user.id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, user: &User) -> Result<(), UserError> {
        match self.store.update(&UserRow::from(user)).await? {
            0 => Err(UserError::not_found(&user.id)),
            _ => Ok(()),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), UserError> {
        let removed = self.store.delete(id).await?;
        if removed == 0 {
            tracing::debug!(user_id = %id, "Delete matched no rows");
        }
        Ok(())
    }
}
