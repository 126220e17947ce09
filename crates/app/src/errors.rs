//! User-facing error classification.

use platter::{checkout::FieldErrors, coupons::CouponRejection};

/// Boxed error from a collaborator implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message shown for anything that does not have a better one.
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// How an error is presented at the view that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, shown next to the offending field.
    Validation,

    /// Something the user referred to does not exist, shown inline.
    NotFound,

    /// A remote call failed, shown as a dismissible banner with retry.
    Remote,

    /// Checkout was attempted with nothing in the cart; the view redirects.
    EmptyCart,

    /// Anything else, downgraded to a generic message.
    Unexpected,
}

/// An error that can be shown to the user without ending the session.
pub trait UserFacing {
    /// Presentation class.
    fn kind(&self) -> ErrorKind;

    /// Message to show.
    fn user_message(&self) -> String;
}

impl UserFacing for CouponRejection {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Blank | Self::BelowMinimum { .. } => ErrorKind::Validation,
            Self::NotFound => ErrorKind::NotFound,
        }
    }

    fn user_message(&self) -> String {
        self.to_string()
    }
}

impl UserFacing for FieldErrors {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }

    fn user_message(&self) -> String {
        self.to_string()
    }
}
