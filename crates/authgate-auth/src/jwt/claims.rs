//! JWT claims embedded in access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authgate_core::types::UserId;
use authgate_entity::user::User;

/// The identity carried by both token classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// The user ID.
    pub user_id: UserId,
    /// Email at issuance time.
    pub email: String,
    /// Username at issuance time.
    pub username: String,
}

impl From<&User> for TokenPayload {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

/// Full claim set of a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Email.
    pub email: String,
    /// Username.
    pub username: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Random token ID; two tokens minted in the same second still differ.
    pub jti: Uuid,
    /// Token type: "access" or "refresh".
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived, stateless request credential.
    Access,
    /// Long-lived, single-use credential for renewing the pair.
    Refresh,
}

impl Claims {
    /// Build claims for `payload` valid from `issued_at` until `expires_at`.
    pub fn new(
        payload: &TokenPayload,
        token_type: TokenType,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: payload.user_id,
            email: payload.email.clone(),
            username: payload.username.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        }
    }

    /// The identity carried by these claims, without expiry metadata.
    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            user_id: self.sub,
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}
