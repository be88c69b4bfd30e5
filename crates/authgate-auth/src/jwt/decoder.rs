//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Validates JWT signatures, expiry, and token class.
#[derive(Clone)]
pub struct JwtDecoder {
    access_key: DecodingKey,
    refresh_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock skew

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token against the access secret.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_token(token, TokenType::Access)
    }

    /// Decodes and validates a refresh token against the refresh secret.
    pub fn decode_refresh_token(&self, token: &str) -> Result<Claims, AppError> {
        self.decode_token(token, TokenType::Refresh)
    }

    fn decode_token(&self, token: &str, expected: TokenType) -> Result<Claims, AppError> {
        let key = match expected {
            TokenType::Access => &self.access_key,
            TokenType::Refresh => &self.refresh_key,
        };

        let token_data = decode::<Claims>(token, key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::forbidden("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::forbidden("Invalid token signature")
                }
                _ => AppError::forbidden(format!("Token validation failed: {e}")),
            }
        })?;

        if token_data.claims.token_type != expected {
            return Err(AppError::forbidden(format!(
                "Invalid token type: expected {expected:?} token"
            )));
        }

        Ok(token_data.claims)
    }
}
