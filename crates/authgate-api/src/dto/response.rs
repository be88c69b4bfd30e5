//! Response DTOs.
//!
//! Success bodies are flat: `{"success": true, "message": ..., <payload fields>}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use authgate_auth::{LoginResult, TokenPair};
use authgate_core::types::UserId;
use authgate_entity::user::UserProfile;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Payload fields, inlined next to `success` and `message`.
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl ApiResponse<Empty> {
    /// A success response that carries only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::ok(message, Empty {})
    }
}

/// No payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

/// User summary returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
}

impl From<UserProfile> for UserSummary {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Signup payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    /// The created user.
    pub user: UserSummary,
}

/// Login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// User info.
    pub user: UserSummary,
}

impl From<LoginResult> for LoginResponse {
    fn from(result: LoginResult) -> Self {
        Self {
            access_token: result.tokens.access_token,
            refresh_token: result.tokens.refresh_token,
            user: result.user.into(),
        }
    }
}

/// Refresh payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// New access token.
    pub access_token: String,
    /// New refresh token; the presented one is now invalid.
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Profile of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    /// User ID.
    pub id: UserId,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileUser {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Profile payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The authenticated user.
    pub user: ProfileUser,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Server version.
    pub version: String,
    /// "connected" or "unavailable".
    pub database: String,
}
