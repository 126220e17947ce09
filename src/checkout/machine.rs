//! Checkout state machine
//!
//! ```text
//! Browsing -> FormEntry -> Validating -> Submitting -> Confirmed
//!                ^             |              |
//!                +-------------+--------------+
//! ```
//!
//! [`transition`] is pure: it only computes the next phase. Side effects such as
//! persisting the order or clearing the cart belong to the caller.

use thiserror::Error;

use crate::checkout::{
    form::{Field, FieldErrors},
    order::Order,
};

/// The checkout form as shown to the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    /// Field-scoped validation messages
    pub errors: FieldErrors,

    /// Banner shown after a failed submission
    pub notice: Option<String>,
}

/// Where the session is in the checkout flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutPhase {
    /// Looking at restaurants and menus.
    #[default]
    Browsing,

    /// Filling in delivery details.
    FormEntry(FormState),

    /// Checking the form.
    Validating,

    /// Waiting for the order to be persisted; the submit control is disabled.
    Submitting,

    /// The order was placed.
    Confirmed(Box<Order>),
}

impl CheckoutPhase {
    /// Phase name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Browsing => "browsing",
            Self::FormEntry(_) => "form_entry",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Confirmed(_) => "confirmed",
        }
    }

    /// The confirmed order, once there is one.
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::Confirmed(order) => Some(order),
            _ => None,
        }
    }

    /// The form state while the form is shown.
    pub fn form(&self) -> Option<&FormState> {
        match self {
            Self::FormEntry(form) => Some(form),
            _ => None,
        }
    }

    /// Whether the submit control should accept input.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::FormEntry(_))
    }
}

/// Something that happened during checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent {
    /// The user opened checkout.
    Enter {
        /// Whether the cart had no lines at entry time
        cart_is_empty: bool,
    },

    /// The user edited a field.
    Edit(Field),

    /// The user pressed submit.
    Submit,

    /// The form had errors.
    Rejected(FieldErrors),

    /// The form was valid.
    Accepted,

    /// The order was stored.
    Persisted(Box<Order>),

    /// Storing the order failed, with a message for the banner.
    Failed(String),

    /// The user went back to browsing from the form.
    Leave,

    /// The user finished looking at the confirmation.
    Finish,
}

impl CheckoutEvent {
    /// Event name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enter { .. } => "enter",
            Self::Edit(_) => "edit",
            Self::Submit => "submit",
            Self::Rejected(_) => "rejected",
            Self::Accepted => "accepted",
            Self::Persisted(_) => "persisted",
            Self::Failed(_) => "failed",
            Self::Leave => "leave",
            Self::Finish => "finish",
        }
    }
}

/// An event that the current phase does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot handle {event} while {phase}")]
pub struct InvalidTransition {
    /// Phase the machine was in
    pub phase: &'static str,

    /// Event that was refused
    pub event: &'static str,
}

/// Compute the next phase.
///
/// Entering checkout with an empty cart is not an error: the session is sent
/// back to [`CheckoutPhase::Browsing`].
///
/// # Errors
///
/// Returns [`InvalidTransition`] when `event` makes no sense in `phase`, for
/// example a second submit while one is in flight.
pub fn transition(
    phase: &CheckoutPhase,
    event: CheckoutEvent,
) -> Result<CheckoutPhase, InvalidTransition> {
    let next = match (phase, event) {
        (
            CheckoutPhase::Browsing | CheckoutPhase::Confirmed(_),
            CheckoutEvent::Enter { cart_is_empty },
        ) => {
            if cart_is_empty {
                CheckoutPhase::Browsing
            } else {
                CheckoutPhase::FormEntry(FormState::default())
            }
        }
        (CheckoutPhase::FormEntry(form), CheckoutEvent::Edit(field)) => {
            let mut form = form.clone();
            form.errors.clear(field);

            CheckoutPhase::FormEntry(form)
        }
        (CheckoutPhase::FormEntry(_), CheckoutEvent::Submit) => CheckoutPhase::Validating,
        (CheckoutPhase::FormEntry(_), CheckoutEvent::Leave)
        | (CheckoutPhase::Confirmed(_), CheckoutEvent::Finish) => CheckoutPhase::Browsing,
        (CheckoutPhase::Validating, CheckoutEvent::Rejected(errors)) => {
            CheckoutPhase::FormEntry(FormState {
                errors,
                notice: None,
            })
        }
        (CheckoutPhase::Validating, CheckoutEvent::Accepted) => CheckoutPhase::Submitting,
        (CheckoutPhase::Submitting, CheckoutEvent::Persisted(order)) => {
            CheckoutPhase::Confirmed(order)
        }
        (CheckoutPhase::Submitting, CheckoutEvent::Failed(message)) => {
            CheckoutPhase::FormEntry(FormState {
                errors: FieldErrors::new(),
                notice: Some(message),
            })
        }
        (phase, event) => {
            return Err(InvalidTransition {
                phase: phase.name(),
                event: event.name(),
            });
        }
    };

    Ok(next)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn form_entry() -> CheckoutPhase {
        CheckoutPhase::FormEntry(FormState::default())
    }

    #[test]
    fn entering_with_empty_cart_stays_browsing() -> TestResult {
        let next = transition(
            &CheckoutPhase::Browsing,
            CheckoutEvent::Enter {
                cart_is_empty: true,
            },
        )?;

        assert_eq!(next, CheckoutPhase::Browsing);

        Ok(())
    }

    #[test]
    fn entering_with_items_shows_the_form() -> TestResult {
        let next = transition(
            &CheckoutPhase::Browsing,
            CheckoutEvent::Enter {
                cart_is_empty: false,
            },
        )?;

        assert_eq!(next, form_entry());

        Ok(())
    }

    #[test]
    fn happy_path_reaches_submitting() -> TestResult {
        let validating = transition(&form_entry(), CheckoutEvent::Submit)?;
        let submitting = transition(&validating, CheckoutEvent::Accepted)?;

        assert_eq!(submitting, CheckoutPhase::Submitting);
        assert!(!submitting.can_submit());

        Ok(())
    }

    #[test]
    fn rejected_form_returns_to_entry_with_errors() -> TestResult {
        let mut errors = FieldErrors::new();
        errors.push(Field::PhoneNumber, "Phone number is required");

        let next = transition(&CheckoutPhase::Validating, CheckoutEvent::Rejected(errors))?;

        assert_eq!(
            next.form()
                .and_then(|form| form.errors.get(Field::PhoneNumber)),
            Some("Phone number is required")
        );

        Ok(())
    }

    #[test]
    fn failed_submission_returns_to_entry_with_notice() -> TestResult {
        let next = transition(
            &CheckoutPhase::Submitting,
            CheckoutEvent::Failed("Failed to place order. Please try again.".to_string()),
        )?;

        assert_eq!(
            next.form().and_then(|form| form.notice.as_deref()),
            Some("Failed to place order. Please try again.")
        );

        Ok(())
    }

    #[test]
    fn second_submit_while_submitting_is_refused() {
        let result = transition(&CheckoutPhase::Submitting, CheckoutEvent::Submit);

        assert_eq!(
            result,
            Err(InvalidTransition {
                phase: "submitting",
                event: "submit",
            })
        );
    }

    #[test]
    fn editing_a_field_clears_only_its_error() -> TestResult {
        let mut errors = FieldErrors::new();
        errors.push(Field::DeliveryAddress, "Delivery address is required");
        errors.push(Field::PhoneNumber, "Phone number is required");
        let phase = CheckoutPhase::FormEntry(FormState {
            errors,
            notice: None,
        });

        let next = transition(&phase, CheckoutEvent::Edit(Field::DeliveryAddress))?;
        let form = next.form().ok_or("expected form entry")?;

        assert!(form.errors.get(Field::DeliveryAddress).is_none());
        assert!(form.errors.get(Field::PhoneNumber).is_some());

        Ok(())
    }

    #[test]
    fn browsing_cannot_submit() {
        assert!(transition(&CheckoutPhase::Browsing, CheckoutEvent::Submit).is_err());
    }
}
