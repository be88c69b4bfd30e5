//! JWT token creation with one signing key per token class.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

use super::claims::{Claims, TokenPayload, TokenType};

/// A freshly signed token and its expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The compact JWT string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Creates signed JWT access and refresh tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    access_key: EncodingKey,
    refresh_key: EncodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: config.access_ttl()?,
            refresh_ttl: config.refresh_ttl()?,
        })
    }

    /// Overrides both lifetimes.
    pub fn with_lifetimes(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Signs an access token with the access secret.
    pub fn access_token(&self, payload: &TokenPayload) -> Result<IssuedToken, AppError> {
        self.sign(payload, TokenType::Access)
    }

    /// Signs a refresh token with the refresh secret.
    pub fn refresh_token(&self, payload: &TokenPayload) -> Result<IssuedToken, AppError> {
        self.sign(payload, TokenType::Refresh)
    }

    /// Generates a new access + refresh token pair.
    pub fn token_pair(&self, payload: &TokenPayload) -> Result<TokenPair, AppError> {
        let access = self.access_token(payload)?;
        let refresh = self.refresh_token(payload)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        })
    }

    fn sign(&self, payload: &TokenPayload, token_type: TokenType) -> Result<IssuedToken, AppError> {
        let (key, ttl) = match token_type {
            TokenType::Access => (&self.access_key, self.access_ttl),
            TokenType::Refresh => (&self.refresh_key, self.refresh_ttl),
        };

        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims::new(payload, token_type, now, expires_at);

        let token = encode(&Header::default(), &claims, key).map_err(|e| {
            AppError::internal(format!("Failed to encode {token_type:?} token: {e}"))
        })?;

        Ok(IssuedToken { token, expires_at })
    }
}
