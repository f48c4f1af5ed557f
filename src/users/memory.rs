//! In-process user repository.
//!
//! Same contract as the PostgreSQL repository, backed by a concurrent map.
//! Backs the test suites.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::users::error::UserError;
use crate::users::model::User;
use crate::users::repository::UserRepository;

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: DashMap<String, User>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.iter().map(|r| r.value().clone()).collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn get_by_id(&self, id: &str) -> Result<User, UserError> {
        self.users
            .get(id)
            .map(|r| r.value().clone())
            .ok_or_else(|| UserError::not_found(id))
    }

    async fn create(&self, user: &User) -> Result<(), UserError> {
        match self.users.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(UserError::already_exists(&user.id)),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(())
            }
        }
    }

    async fn update(&self, user: &User) -> Result<(), UserError> {
        match self.users.get_mut(&user.id) {
            Some(mut existing) => {
                existing.email = user.email.clone();
                existing.name = user.name.clone();
                existing.updated_at = user.updated_at;
                Ok(())
            }
            None => Err(UserError::not_found(&user.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), UserError> {
        self.users.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            email: format!("{id}@example.com"),
            name: id.into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let repo = MemoryUserRepository::new();
        repo.create(&user("a")).await.unwrap();
        let err = repo.create(&user("a")).await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists { .. }));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let repo = MemoryUserRepository::new();
        let err = repo.update(&user("ghost")).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let repo = MemoryUserRepository::new();
        let original = user("a");
        repo.create(&original).await.unwrap();

        let mut changed = original.clone();
        changed.name = "renamed".into();
        changed.created_at = original.created_at + chrono::Duration::days(1);
        changed.updated_at = original.updated_at + chrono::Duration::seconds(1);
        repo.update(&changed).await.unwrap();

        let stored = repo.get_by_id("a").await.unwrap();
        assert_eq!(stored.name, "renamed");
        assert_eq!(stored.created_at, original.created_at);
        assert_eq!(stored.updated_at, changed.updated_at);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_ok() {
        let repo = MemoryUserRepository::new();
        assert!(repo.delete("missing").await.is_ok());
        assert!(repo.is_empty());
    }
}
