//! Auth errors.

use thiserror::Error;

use crate::errors::{BoxError, ErrorKind, UNEXPECTED_MESSAGE, UserFacing};

#[derive(Debug, Error)]
pub enum AuthError {
    /// The auth service refused the request, e.g. wrong password.
    #[error("{0}")]
    Rejected(String),

    #[error("not signed in")]
    NotSignedIn,

    #[error("auth service unavailable")]
    Unavailable(#[source] BoxError),
}

impl UserFacing for AuthError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Remote
    }

    fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::NotSignedIn => "Please sign in to continue".to_string(),
            Self::Unavailable(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}
