//! Local checks run before credentials are sent anywhere.

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Email and password for login.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

impl LoginCredentials {
    /// Rejects empty fields. Email is trimmed; the password is taken as typed.
    pub fn new(email: &str, password: &str) -> Result<Self, ValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if password.is_empty() {
            return Err(ValidationError::empty_field("password"));
        }
        Ok(Self {
            email: email.to_string(),
            password: SecretString::new(password.to_string()),
        })
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Details for creating an account.
#[derive(Debug, Clone)]
pub struct SignupDetails {
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

impl SignupDetails {
    /// Checks, in order: every field present, password matches confirmation,
    /// password long enough.
    pub fn new(
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        let email = email.trim();
        for (field, value) in [("name", name), ("email", email), ("password", password)] {
            if value.is_empty() {
                return Err(ValidationError::empty_field(field));
            }
        }
        if password != confirm {
            return Err(ValidationError::mismatch("password"));
        }
        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::too_short("password", MIN_PASSWORD_LENGTH, length));
        }
        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            password: SecretString::new(password.to_string()),
        })
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
