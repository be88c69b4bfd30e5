//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

use authgate_auth::PasswordValidator;
use authgate_core::error::AppError;

/// Cleans up raw input before validation runs.
pub trait Normalize {
    /// Trim and case-fold fields in place.
    fn normalize(&mut self);
}

/// Signup request body. Missing fields deserialize as empty strings so they
/// fail their field rule instead of the JSON parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SignupRequest {
    /// Username, 3 to 30 of `[A-Za-z0-9_]`.
    #[validate(
        length(min = 3, max = 30, message = "Username must be between 3 and 30 characters"),
        custom(function = "validate_username_charset")
    )]
    pub username: String,
    /// Email address.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    /// Plaintext password. Length policy comes from configuration, see
    /// [`SignupRequest::validate_with_policy`].
    pub password: String,
}

impl SignupRequest {
    /// Runs the field rules and the password policy in one pass, so every
    /// failing field is reported together.
    pub fn validate_with_policy(
        &self,
        policy: &PasswordValidator,
    ) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(e) = policy.validate(&self.password) {
            errors.add(
                "password",
                ValidationError::new("password_length").with_message(e.message.into()),
            );
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Normalize for SignupRequest {
    fn normalize(&mut self) {
        self.username = self.username.trim().to_string();
        self.email = normalize_email(&self.email);
    }
}

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl Normalize for LoginRequest {
    fn normalize(&mut self) {
        self.email = normalize_email(&self.email);
    }
}

/// Token refresh request body. A missing token is an authentication
/// failure, not a validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token. Kept as raw JSON so a non-string value is rejected as
    /// an unusable token rather than a malformed body.
    #[serde(default)]
    pub refresh_token: Option<Value>,
}

impl RefreshRequest {
    /// The presented token.
    ///
    /// Absent, `null` or blank is `Unauthorized`; any non-string value is
    /// `Forbidden`, like a token that fails verification.
    pub fn into_token(self) -> Result<String, AppError> {
        match self.refresh_token {
            Some(Value::String(token)) if !token.trim().is_empty() => Ok(token),
            None | Some(Value::Null) | Some(Value::String(_)) => {
                Err(AppError::unauthorized("Refresh token required"))
            }
            Some(_) => Err(AppError::forbidden("Invalid or expired refresh token")),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_username_charset(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset").with_message(
            "Username can only contain letters, numbers, and underscores".into(),
        ))
    }
}
