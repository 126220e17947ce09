//! Backend errors and their mapping onto collaborator errors.

use reqwest::StatusCode;
use thiserror::Error;

use crate::{auth::AuthError, catalog::CatalogError, orders::OrderSinkError};

/// Errors that can occur when communicating with the hosted backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("backend returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The backend answered 2xx with a body we cannot use.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),
}

impl BackendError {
    /// The backend's message when it refused the request itself.
    fn client_message(&self) -> Option<String> {
        match self {
            Self::Status { status, message } if status.is_client_error() => Some(message.clone()),
            _ => None,
        }
    }
}

impl From<BackendError> for AuthError {
    fn from(error: BackendError) -> Self {
        match error.client_message() {
            Some(message) => Self::Rejected(message),
            None => Self::Unavailable(Box::new(error)),
        }
    }
}

impl From<BackendError> for CatalogError {
    fn from(error: BackendError) -> Self {
        Self::Unavailable(Box::new(error))
    }
}

impl From<BackendError> for OrderSinkError {
    fn from(error: BackendError) -> Self {
        match error.client_message() {
            Some(message) => Self::Rejected(message),
            None => Self::Unavailable(Box::new(error)),
        }
    }
}
