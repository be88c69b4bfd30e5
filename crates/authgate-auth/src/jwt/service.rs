//! The token service: issue and verify both token classes.

use chrono::Duration;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

use super::claims::TokenPayload;
use super::decoder::JwtDecoder;
use super::encoder::{IssuedToken, JwtEncoder, TokenPair};

/// Issues and verifies access and refresh tokens.
///
/// Access and refresh tokens are signed with different secrets, so a token
/// of one class never verifies as the other. Issuing has no side effects;
/// persisting refresh tokens is the session manager's job.
#[derive(Debug, Clone)]
pub struct TokenService {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenService {
    /// Build a token service from validated configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Ok(Self {
            encoder: JwtEncoder::new(config)?,
            decoder: JwtDecoder::new(config),
        })
    }

    /// Overrides the configured token lifetimes.
    pub fn with_lifetimes(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.encoder = self.encoder.with_lifetimes(access_ttl, refresh_ttl);
        self
    }

    /// Sign `payload` as an access token.
    pub fn issue_access_token(&self, payload: &TokenPayload) -> Result<IssuedToken, AppError> {
        self.encoder.access_token(payload)
    }

    /// Sign `payload` as a refresh token.
    pub fn issue_refresh_token(&self, payload: &TokenPayload) -> Result<IssuedToken, AppError> {
        self.encoder.refresh_token(payload)
    }

    /// Sign a fresh access + refresh pair for `payload`.
    pub fn issue_pair(&self, payload: &TokenPayload) -> Result<TokenPair, AppError> {
        self.encoder.token_pair(payload)
    }

    /// Verify an access token. Fails with `Forbidden` if the token is
    /// malformed, expired, or not signed with the access secret.
    pub fn verify_access_token(&self, token: &str) -> Result<TokenPayload, AppError> {
        self.decoder
            .decode_access_token(token)
            .map(|claims| claims.payload())
    }

    /// Verify a refresh token. Fails with `Forbidden` if the token is
    /// malformed, expired, or not signed with the refresh secret.
    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenPayload, AppError> {
        self.decoder
            .decode_refresh_token(token)
            .map(|claims| claims.payload())
    }
}

#[cfg(test)]
mod tests {
    use authgate_core::error::ErrorKind;
    use authgate_core::types::UserId;

    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret-for-tests".to_string(),
            refresh_secret: "refresh-secret-for-tests".to_string(),
            ..AuthConfig::default()
        }
    }

    fn payload() -> TokenPayload {
        TokenPayload {
            user_id: UserId::new(),
            email: "a@x.com".to_string(),
            username: "alice01".to_string(),
        }
    }

    #[test]
    fn test_access_token_roundtrip() {
        let service = TokenService::new(&config()).unwrap();
        let payload = payload();

        let issued = service.issue_access_token(&payload).unwrap();
        assert_eq!(service.verify_access_token(&issued.token).unwrap(), payload);
    }

    #[test]
    fn test_refresh_token_roundtrip() {
        let service = TokenService::new(&config()).unwrap();
        let payload = payload();

        let issued = service.issue_refresh_token(&payload).unwrap();
        assert_eq!(service.verify_refresh_token(&issued.token).unwrap(), payload);
    }

    #[test]
    fn test_token_classes_do_not_cross_verify() {
        let service = TokenService::new(&config()).unwrap();
        let pair = service.issue_pair(&payload()).unwrap();

        let err = service.verify_refresh_token(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        let err = service.verify_access_token(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_default_lifetimes() {
        let service = TokenService::new(&config()).unwrap();
        let pair = service.issue_pair(&payload()).unwrap();
        let now = chrono::Utc::now();

        let access_minutes = (pair.access_expires_at - now).num_minutes();
        assert!((14..=15).contains(&access_minutes));
        let refresh_hours = (pair.refresh_expires_at - now).num_hours();
        assert!((167..=168).contains(&refresh_hours));
    }

    #[test]
    fn test_pairs_are_unique_within_a_second() {
        let service = TokenService::new(&config()).unwrap();
        let payload = payload();

        let first = service.issue_pair(&payload).unwrap();
        let second = service.issue_pair(&payload).unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_ne!(first.access_token, second.access_token);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = TokenService::new(&config())
            .unwrap()
            .with_lifetimes(Duration::seconds(-120), Duration::seconds(-120));
        let pair = service.issue_pair(&payload()).unwrap();

        let err = service.verify_access_token(&pair.access_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        let err = service.verify_refresh_token(&pair.refresh_token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let service = TokenService::new(&config()).unwrap();
        let other = TokenService::new(&AuthConfig {
            access_secret: "another-access".to_string(),
            refresh_secret: "another-refresh".to_string(),
            ..AuthConfig::default()
        })
        .unwrap();

        let pair = other.issue_pair(&payload()).unwrap();
        assert!(service.verify_access_token(&pair.access_token).is_err());
        assert!(service.verify_refresh_token(&pair.refresh_token).is_err());
        assert!(service.verify_access_token("not.a.jwt").is_err());
    }
}
