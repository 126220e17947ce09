//! Order sink errors.

use thiserror::Error;

use crate::errors::BoxError;

#[derive(Debug, Error)]
pub enum OrderSinkError {
    /// The backend refused the order.
    #[error("order rejected: {0}")]
    Rejected(String),

    #[error("order store unavailable")]
    Unavailable(#[source] BoxError),
}
