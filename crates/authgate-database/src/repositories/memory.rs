//! In-memory user repository using a Tokio mutex.
//!
//! Suitable for tests and single-process development only.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::types::UserId;
use authgate_entity::user::{CreateUser, User, UserProfile};

use crate::store::UserStore;

/// In-memory user repository. Every operation holds the lock for its whole
/// read-modify-write, which makes the refresh-token swap atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete a user. Returns `true` if the user existed.
    pub async fn remove(&self, id: UserId) -> bool {
        self.users.lock().await.remove(&id).is_some()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.lock().await.len()
    }

    /// Whether the repository holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.lock().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let email = data.email.to_lowercase();
        let mut users = self.users.lock().await;

        let duplicate = users
            .values()
            .any(|u| u.username == data.username || u.email == email);
        if duplicate {
            return Err(AppError::conflict(
                "User with this email or username already exists",
            ));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: data.username.clone(),
            email,
            password_hash: data.password_hash.clone(),
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "User stored in memory");

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.lock().await.get(&id).cloned())
    }

    async fn find_profile(&self, id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.users.lock().await.get(&id).map(User::profile))
    }

    async fn set_refresh_token(&self, id: UserId, token: &str) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.refresh_token = Some(token.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn swap_refresh_token(&self, id: UserId, expected: &str, new: &str) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        match users.get_mut(&id) {
            Some(user) if user.holds_refresh_token(expected) => {
                user.refresh_token = Some(new.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_token(&self, id: UserId) -> AppResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
        user.refresh_token = None;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.closed.load(Ordering::Acquire))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
