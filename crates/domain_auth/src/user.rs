//! User records and login credentials

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::UserId;

/// A registered user
///
/// Users are created once at registration and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,
    /// Unique email address
    pub email: String,
    /// bcrypt digest of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Email and plaintext password supplied by a caller
#[derive(Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Removes whitespace around the email; the password is kept verbatim
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("a@x.com", "secret1");
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("secret1"));

        let user = User {
            id: UserId::new(1),
            email: "a@x.com".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
        };
        assert!(!format!("{:?}", user).contains("$2b$"));
    }

    #[test]
    fn test_validation() {
        assert!(Credentials::new("a@x.com", "secret1").validate().is_ok());
        assert!(Credentials::new("not-an-email", "secret1").validate().is_err());
        assert!(Credentials::new("a@x.com", "short").validate().is_err());
    }

    #[test]
    fn test_normalized_trims_email_only() {
        let credentials = Credentials::new("  a@x.com\t", " secret1 ").normalized();
        assert_eq!(credentials.email, "a@x.com");
        assert_eq!(credentials.password, " secret1 ");
        assert!(credentials.validate().is_ok());
    }
}
