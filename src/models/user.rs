use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Access tag carried by tokens issued at signup/login.
pub const AUTH_ACCESS: &str = "auth";

/// One issued credential kept on the user document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access: String,
    pub token: String,
}

/// A user document.
///
/// Serializing a `User` only ever produces `{"id", "email"}`; the password hash
/// and the token list never leave the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_serializing)]
    pub tokens: Vec<AuthToken>,
}

impl User {
    /// Returns `true` if `token` was issued to this user with the given access tag.
    pub fn has_token(&self, token: &str, access: &str) -> bool {
        self.tokens
            .iter()
            .any(|entry| entry.token == token && entry.access == access)
    }
}

/// Credentials posted to `/users` and `/users/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct UserInput {
    /// Must be a valid email address once trimmed.
    #[validate(email, length(min = 1))]
    pub email: String,
    /// At least 6 characters.
    #[validate(length(min = 6))]
    pub password: String,
}

impl UserInput {
    /// Trims the email the same way the store would before validating.
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

/// A validated user whose password has already been hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            email: self.email,
            password: self.password_hash,
            tokens: Vec::new(),
        }
    }
}
