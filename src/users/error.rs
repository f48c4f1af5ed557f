use thiserror::Error;

use crate::http::ApiError;
use crate::users::store::StoreError;

/// Errors raised by the repository and service layers.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found: {id}")]
    NotFound { id: String },

    #[error("user already exists: {id}")]
    AlreadyExists { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl UserError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound { .. } => ApiError::NotFound("User not found".to_string()),
            // Identifiers are server-generated, so a collision is an internal fault.
            UserError::AlreadyExists { .. } | UserError::Store(_) => {
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}
