//! Sign-in and sign-up form.

use std::fmt;

use thiserror::Error;
use zeroize::Zeroizing;

use crate::{
    auth::models::{Credentials, Registration},
    errors::{ErrorKind, UserFacing},
};

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Shown after a successful sign-up.
pub const VERIFY_EMAIL_NOTICE: &str =
    "Please check your email to verify your account before signing in.";

/// Which form is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Sign-up input that fails local checks. Checked in declaration order and
/// reported one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFormError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,

    #[error("Full name is required")]
    FullNameRequired,
}

impl UserFacing for AuthFormError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    fn user_message(&self) -> String {
        self.to_string()
    }
}

/// A request built from a valid form.
#[derive(Debug, Clone)]
pub enum AuthRequest {
    SignIn(Credentials),
    SignUp(Registration),
}

/// Contents of the login view.
#[derive(Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub email: String,
    pub password: Zeroizing<String>,
    pub confirm_password: Zeroizing<String>,
    pub full_name: String,

    /// Banner text: an error, or the verification notice after sign-up.
    pub message: Option<String>,
}

impl fmt::Debug for AuthForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthForm")
            .field("mode", &self.mode)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl AuthForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch between sign-in and sign-up. Every field and the banner are cleared.
    pub fn toggle_mode(&mut self) {
        let mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };

        *self = Self {
            mode,
            ..Self::default()
        };
    }

    /// Build the request for the current mode.
    ///
    /// # Errors
    ///
    /// Returns the first failing sign-up check. Sign-in has no local checks.
    pub fn request(&self) -> Result<AuthRequest, AuthFormError> {
        let credentials = Credentials::new(self.email.trim(), self.password.as_str());

        match self.mode {
            AuthMode::SignIn => Ok(AuthRequest::SignIn(credentials)),
            AuthMode::SignUp => {
                if *self.password != *self.confirm_password {
                    return Err(AuthFormError::PasswordMismatch);
                }

                if self.password.chars().count() < MIN_PASSWORD_LENGTH {
                    return Err(AuthFormError::PasswordTooShort);
                }

                let full_name = self.full_name.trim();
                if full_name.is_empty() {
                    return Err(AuthFormError::FullNameRequired);
                }

                Ok(AuthRequest::SignUp(Registration {
                    credentials,
                    full_name: full_name.to_string(),
                }))
            }
        }
    }

    /// Switch to sign-in after a sign-up, keeping the typed e-mail.
    pub(crate) fn signed_up(&mut self) {
        self.mode = AuthMode::SignIn;
        self.message = Some(VERIFY_EMAIL_NOTICE.to_string());
    }
}
