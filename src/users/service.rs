//! User business rules.
//!
//! Identifier generation, timestamping and the partial-update merge live
//! here; request validation happens at the HTTP boundary.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::users::error::UserError;
use crate::users::model::{CreateUserRequest, UpdateUserRequest, User};
use crate::users::repository::UserRepository;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "users.service.get_users", skip(self))]
    pub async fn get_users(&self) -> Result<Vec<User>, UserError> {
        let users = self.repo.list().await?;
        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(name = "users.service.get_user", skip(self))]
    pub async fn get_user(&self, id: &str) -> Result<User, UserError> {
        self.repo.get_by_id(id).await
    }

    #[instrument(name = "users.service.create_user", skip(self, req), fields(email = %req.email))]
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User, UserError> {
        let now = now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: req.email,
            name: req.name,
            created_at: now,
            updated_at: now,
        };

        self.repo.create(&user).await?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Merge the non-empty fields of `req` into the stored record.
    #[instrument(name = "users.service.update_user", skip(self, req))]
    pub async fn update_user(&self, id: &str, req: UpdateUserRequest) -> Result<User, UserError> {
        let mut user = self.repo.get_by_id(id).await?;

        if !req.email.is_empty() {
            user.email = req.email;
        }
        if !req.name.is_empty() {
            user.name = req.name;
        }
        user.updated_at = next_update_time(user.updated_at);

        self.repo.update(&user).await?;
        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    /// Delete without checking existence first; unknown ids succeed.
    #[instrument(name = "users.service.delete_user", skip(self))]
    pub async fn delete_user(&self, id: &str) -> Result<(), UserError> {
        self.repo.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

/// Current time at the store's precision (microseconds), so a record read
/// back compares equal to the one returned on create.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// A new `updated_at` strictly after `previous`, even if the clock has not
/// advanced (or went backwards) since the last write.
fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
