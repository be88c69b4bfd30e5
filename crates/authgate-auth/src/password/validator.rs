//! Password policy enforcement for new passwords.

use serde_json::json;

use authgate_core::config::AuthConfig;
use authgate_core::error::AppError;

/// Upper bound on accepted passwords, keeping Argon2 input bounded.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validates new passwords against the configured length policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Minimum accepted length.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Returns `Ok(())` if the password meets the policy, or a validation
    /// error describing the violation.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let length = password.chars().count();

        if length < self.min_length {
            return Err(password_error(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if length > MAX_PASSWORD_LENGTH {
            return Err(password_error(format!(
                "Password must be at most {MAX_PASSWORD_LENGTH} characters long"
            )));
        }

        Ok(())
    }
}

/// A validation error carrying a field-level entry for `password`.
fn password_error(message: String) -> AppError {
    let details = json!([{ "field": "password", "message": message }]);
    AppError::validation(message).with_details(details)
}
