//! Checkout errors.

use std::time::Duration;

use platter::checkout::{FieldErrors, InvalidTransition};
use thiserror::Error;

use crate::{
    errors::{ErrorKind, UNEXPECTED_MESSAGE, UserFacing},
    orders::OrderSinkError,
};

/// Banner shown when an order could not be stored.
pub const PLACE_ORDER_FAILED: &str = "Failed to place order. Please try again.";

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("delivery details are invalid: {0}")]
    Invalid(FieldErrors),

    #[error("an order is already being placed")]
    InFlight,

    #[error("failed to store order")]
    Persist(#[source] OrderSinkError),

    #[error("order submission timed out after {0:?}")]
    TimedOut(Duration),

    #[error("checkout is in the wrong state")]
    Transition(#[from] InvalidTransition),

    #[error("could not compute delivery estimate")]
    Clock(#[source] jiff::Error),
}

impl UserFacing for CheckoutError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyCart => ErrorKind::EmptyCart,
            Self::Invalid(_) => ErrorKind::Validation,
            Self::Persist(_) | Self::TimedOut(_) => ErrorKind::Remote,
            Self::InFlight | Self::Transition(_) | Self::Clock(_) => ErrorKind::Unexpected,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::Invalid(errors) => errors.to_string(),
            Self::InFlight => "Your order is already being placed".to_string(),
            Self::Persist(_) | Self::TimedOut(_) => PLACE_ORDER_FAILED.to_string(),
            Self::Transition(_) | Self::Clock(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }
}
