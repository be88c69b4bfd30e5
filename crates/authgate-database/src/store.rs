//! The credential store abstraction and backend selection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use authgate_core::config::{DatabaseConfig, DatabaseProvider};
use authgate_core::result::AppResult;
use authgate_core::types::UserId;
use authgate_entity::user::{CreateUser, User, UserProfile};

use crate::repositories::{MemoryUserRepository, PgUserRepository};

/// Persistent user records and their refresh-token slot.
///
/// Implementations must make [`UserStore::swap_refresh_token`] a single
/// atomic compare-and-swap: two concurrent swaps expecting the same old
/// value can never both succeed.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    /// Insert a new user. Fails with `Conflict` on a duplicate username or
    /// email.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Find a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find a user by id, including credential material.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Find a user by id without password hash or refresh token.
    async fn find_profile(&self, id: UserId) -> AppResult<Option<UserProfile>>;

    /// Unconditionally replace the stored refresh token.
    async fn set_refresh_token(&self, id: UserId, token: &str) -> AppResult<()>;

    /// Replace the stored refresh token only if it still equals `expected`.
    ///
    /// Returns `false` when the stored value differs or the user is gone.
    async fn swap_refresh_token(&self, id: UserId, expected: &str, new: &str) -> AppResult<bool>;

    /// Clear the stored refresh token.
    async fn clear_refresh_token(&self, id: UserId) -> AppResult<()>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Release backend resources. Called once on shutdown.
    async fn close(&self);
}

/// Open the store selected by `config`.
///
/// For PostgreSQL this connects the pool and, if enabled, runs the embedded
/// migrations.
pub async fn open_store(config: &DatabaseConfig) -> AppResult<Arc<dyn UserStore>> {
    match config.provider {
        DatabaseProvider::Postgres => Ok(Arc::new(PgUserRepository::connect(config).await?)),
        DatabaseProvider::Memory => {
            info!("Using in-memory credential store; users are lost on restart");
            Ok(Arc::new(MemoryUserRepository::new()))
        }
    }
}
