//! Per-request bearer token authentication.

use std::sync::Arc;

use tracing::debug;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_database::UserStore;
use authgate_entity::user::UserProfile;

use crate::jwt::{TokenPayload, TokenService};

/// The authenticated identity attached to a request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The user as currently stored, without secrets.
    pub user: UserProfile,
    /// The identity embedded in the presented access token.
    pub payload: TokenPayload,
}

/// Verifies access tokens and resolves them to stored users.
///
/// Never reads or writes refresh-token state.
#[derive(Debug, Clone)]
pub struct AuthGate {
    tokens: Arc<TokenService>,
    store: Arc<dyn UserStore>,
}

impl AuthGate {
    /// Creates a gate over the given token service and store.
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn UserStore>) -> Self {
        Self { tokens, store }
    }

    /// Extracts the token from an `Authorization: Bearer <token>` value.
    ///
    /// The scheme is matched case-insensitively. Returns `None` for any
    /// other scheme or an empty token.
    pub fn extract_bearer(header: Option<&str>) -> Option<&str> {
        let (scheme, token) = header?.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// Authenticates a request from its `Authorization` header value.
    ///
    /// - missing or empty bearer token: `Unauthorized`
    /// - invalid, expired, or wrong-class token: `Forbidden`
    /// - token for a user that no longer exists: `Unauthorized`
    pub async fn authenticate(&self, header: Option<&str>) -> AppResult<AuthContext> {
        let token = Self::extract_bearer(header)
            .ok_or_else(|| AppError::unauthorized("Access token required"))?;

        let payload = self.tokens.verify_access_token(token).map_err(|e| {
            debug!(reason = %e.message, "Access token rejected");
            AppError::forbidden("Invalid or expired access token")
        })?;

        let user = self
            .store
            .find_profile(payload.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid token - user not found"))?;

        Ok(AuthContext { user, payload })
    }
}
