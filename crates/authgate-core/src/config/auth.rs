//! Token and credential configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Token signing and password policy configuration.
///
/// Secrets have no usable default: [`AuthConfig::validate`] rejects an empty
/// secret so the server refuses to start without them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for access tokens.
    #[serde(default, skip_serializing)]
    pub access_secret: String,
    /// HMAC secret for refresh tokens. Must differ from `access_secret`.
    #[serde(default, skip_serializing)]
    pub refresh_secret: String,
    /// Access token lifetime, e.g. `"15m"`.
    #[serde(default = "default_access_expire")]
    pub access_expire: String,
    /// Refresh token lifetime, e.g. `"7d"`.
    #[serde(default = "default_refresh_expire")]
    pub refresh_expire: String,
    /// Minimum password length accepted at signup.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: String::new(),
            refresh_secret: String::new(),
            access_expire: default_access_expire(),
            refresh_expire: default_refresh_expire(),
            password_min_length: default_password_min(),
        }
    }
}

impl AuthConfig {
    /// Parsed access token lifetime.
    pub fn access_ttl(&self) -> Result<Duration, AppError> {
        parse_duration(&self.access_expire)
    }

    /// Parsed refresh token lifetime.
    pub fn refresh_ttl(&self) -> Result<Duration, AppError> {
        parse_duration(&self.refresh_expire)
    }

    /// Fails if a secret is missing, both secrets are equal, or a lifetime
    /// cannot be parsed.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.access_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "JWT_ACCESS_SECRET environment variable is required",
            ));
        }
        if self.refresh_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "JWT_REFRESH_SECRET environment variable is required",
            ));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AppError::configuration(
                "JWT_ACCESS_SECRET and JWT_REFRESH_SECRET must differ",
            ));
        }
        self.access_ttl()?;
        self.refresh_ttl()?;
        Ok(())
    }
}

/// Parse a lifetime such as `"30s"`, `"15m"`, `"12h"`, `"7d"`, or a bare
/// number of seconds.
pub fn parse_duration(value: &str) -> Result<Duration, AppError> {
    let value = value.trim();
    let invalid = || AppError::configuration(format!("Invalid duration: '{value}'"));

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    let amount: i64 = digits.parse().map_err(|_| invalid())?;
    if amount <= 0 {
        return Err(invalid());
    }

    let duration = match unit {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    };
    duration.ok_or_else(invalid)
}

fn default_access_expire() -> String {
    "15m".to_string()
}

fn default_refresh_expire() -> String {
    "7d".to_string()
}

fn default_password_min() -> usize {
    6
}
