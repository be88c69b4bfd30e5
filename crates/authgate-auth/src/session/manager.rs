//! Session lifecycle manager: signup, login, refresh rotation, logout.

use std::sync::Arc;

use tracing::{debug, info, warn};

use authgate_core::config::AuthConfig;
use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_core::types::UserId;
use authgate_database::UserStore;
use authgate_entity::user::{CreateUser, UserProfile};

use crate::jwt::{TokenPair, TokenPayload, TokenService};
use crate::password::{PasswordHasher, PasswordValidator};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
const USER_NOT_FOUND: &str = "Invalid token - user not found";

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LoginResult {
    /// Generated token pair.
    pub tokens: TokenPair,
    /// The authenticated user.
    pub user: UserProfile,
}

/// Manages the complete session lifecycle.
///
/// A user holds at most one valid refresh token, stored on the user record.
/// Login overwrites it, rotation swaps it atomically, logout clears it.
/// Access tokens are never stored and are not revoked by any of these.
#[derive(Clone)]
pub struct SessionManager {
    /// Credential store.
    store: Arc<dyn UserStore>,
    /// Token issuance and verification.
    tokens: Arc<TokenService>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Password policy for signup.
    validator: PasswordValidator,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a new session manager.
    pub fn new(store: Arc<dyn UserStore>, tokens: Arc<TokenService>, config: &AuthConfig) -> Self {
        Self {
            store,
            tokens,
            hasher: PasswordHasher::new(),
            validator: PasswordValidator::new(config),
        }
    }

    /// The password policy applied at signup.
    pub fn password_policy(&self) -> &PasswordValidator {
        &self.validator
    }

    /// Registers a new user. Does not issue tokens.
    ///
    /// Fails with `Validation` if the password violates the policy and with
    /// `Conflict` if the username or email is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<UserProfile> {
        self.validator.validate(password)?;

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let password_hash = run_blocking(move || hasher.hash_password(&plaintext)).await?;

        let user = self
            .store
            .create(&CreateUser {
                username: username.trim().to_string(),
                email: email.trim().to_lowercase(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user.profile())
    }

    /// Verifies credentials and starts a session.
    ///
    /// Unknown email and wrong password fail identically. On success the new
    /// refresh token replaces whatever was stored before.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let user = self.store.find_by_email(email.trim()).await?;

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password_valid = run_blocking(move || match stored_hash {
            Some(hash) => hasher.verify_password(&plaintext, &hash),
            None => hasher.verify_dummy(&plaintext),
        })
        .await?;

        let user = match user {
            Some(user) if password_valid => user,
            Some(user) => {
                warn!(user_id = %user.id, "Login failed: wrong password");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
            None => {
                warn!("Login failed: unknown email");
                return Err(AppError::unauthorized(INVALID_CREDENTIALS));
            }
        };

        let tokens = self.tokens.issue_pair(&TokenPayload::from(&user))?;
        self.store
            .set_refresh_token(user.id, &tokens.refresh_token)
            .await
            .map_err(|e| vanished_user(e, INVALID_CREDENTIALS))?;

        info!(user_id = %user.id, "Login successful");

        Ok(LoginResult {
            tokens,
            user: user.profile(),
        })
    }

    /// Exchanges a refresh token for a new pair, invalidating the presented
    /// token.
    ///
    /// Every rejection is `Forbidden`: bad signature or expiry, unknown user,
    /// a token that is not the one currently stored, or a lost race against
    /// a concurrent rotation of the same token.
    pub async fn rotate(&self, presented: &str) -> AppResult<TokenPair> {
        let payload = self.tokens.verify_refresh_token(presented).map_err(|e| {
            debug!(reason = %e.message, "Refresh token rejected");
            AppError::forbidden("Invalid or expired refresh token")
        })?;

        let user = self
            .store
            .find_by_id(payload.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden(INVALID_REFRESH_TOKEN))?;

        if !user.holds_refresh_token(presented) {
            warn!(
                user_id = %user.id,
                "Refresh token reuse or stale token presented"
            );
            return Err(AppError::forbidden(INVALID_REFRESH_TOKEN));
        }

        let tokens = self.tokens.issue_pair(&TokenPayload::from(&user))?;

        let swapped = self
            .store
            .swap_refresh_token(user.id, presented, &tokens.refresh_token)
            .await?;
        if !swapped {
            warn!(user_id = %user.id, "Refresh token rotated concurrently");
            return Err(AppError::forbidden(INVALID_REFRESH_TOKEN));
        }

        info!(user_id = %user.id, "Refresh token rotated");
        Ok(tokens)
    }

    /// Ends the user's session by clearing the stored refresh token.
    ///
    /// A user deleted after the bearer check fails as `Unauthorized`, the
    /// same as a token whose user was already gone.
    pub async fn logout(&self, user_id: UserId) -> AppResult<()> {
        self.store
            .clear_refresh_token(user_id)
            .await
            .map_err(|e| vanished_user(e, USER_NOT_FOUND))?;
        info!(user_id = %user_id, "Logout completed");
        Ok(())
    }
}

/// A store `NotFound` means the user row disappeared mid-request.
fn vanished_user(err: AppError, message: &'static str) -> AppError {
    if err.kind == ErrorKind::NotFound {
        warn!(reason = %err.message, "User vanished during session update");
        AppError::unauthorized(message)
    } else {
        err
    }
}

/// Runs CPU-heavy password work off the async executor.
async fn run_blocking<T, F>(task: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Password task panicked", e))?
}
