//! Auth data models.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,

    /// Name given at sign-up, if any.
    pub full_name: Option<String>,
}

impl User {
    /// Name to greet the user with, falling back to their e-mail address.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// E-mail and password for signing in.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: Zeroizing<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
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

/// A new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub credentials: Credentials,
    pub full_name: String,
}
