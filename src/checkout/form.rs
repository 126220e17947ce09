//! Delivery form

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Number of digits a phone number must have once punctuation is stripped.
pub const PHONE_DIGITS: usize = 10;

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cash,

    /// Credit or debit card
    Card,

    /// UPI transfer
    Upi,

    /// Digital wallet
    Wallet,
}

impl PaymentMethod {
    /// Every payment method in menu order.
    pub const ALL: [Self; 4] = [Self::Cash, Self::Card, Self::Upi, Self::Wallet];

    /// Storage key, e.g. `cash`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Upi => "upi",
            Self::Wallet => "wallet",
        }
    }

    /// Label shown in the payment menu.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash on Delivery",
            Self::Card => "Credit/Debit Card",
            Self::Upi => "UPI",
            Self::Wallet => "Digital Wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown payment method name.
#[derive(Debug, Error)]
#[error("unknown payment method {0:?}")]
pub struct UnknownPaymentMethod(String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

/// A form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Delivery address
    DeliveryAddress,

    /// Phone number
    PhoneNumber,
}

/// A validation problem with one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    /// The offending field
    pub field: Field,

    /// Message shown under the field
    pub message: &'static str,
}

/// Every validation problem found in one pass over the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summary(.0))]
pub struct FieldErrors(SmallVec<[FieldError; 2]>);

impl FieldErrors {
    /// No errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem with `field`.
    pub fn push(&mut self, field: Field, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    /// Message for `field`, if it has one.
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    /// Forget the error for `field`, as happens when the user edits it.
    pub fn clear(&mut self, field: Field) {
        self.0.retain(|error| error.field != field);
    }

    /// Iterate over the errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the form is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Delivery details as typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryDetails {
    /// Free-form address
    pub delivery_address: String,

    /// Phone number in any punctuation
    pub phone_number: String,

    /// Payment method
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Notes for the restaurant or courier
    #[serde(default)]
    pub special_instructions: String,
}

/// Delivery details that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedDelivery {
    /// Trimmed address
    pub delivery_address: String,

    /// Exactly ten digits
    pub phone_number: String,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Trimmed instructions; `None` when blank
    pub special_instructions: Option<String>,
}

impl DeliveryDetails {
    /// Check every field and report all problems together.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] listing each invalid field.
    pub fn validate(&self) -> Result<ValidatedDelivery, FieldErrors> {
        let mut errors = FieldErrors::new();

        let address = self.delivery_address.trim();
        if address.is_empty() {
            errors.push(Field::DeliveryAddress, "Delivery address is required");
        }

        let phone = normalize_phone(&self.phone_number);
        if self.phone_number.trim().is_empty() {
            errors.push(Field::PhoneNumber, "Phone number is required");
        } else if phone.len() != PHONE_DIGITS {
            errors.push(
                Field::PhoneNumber,
                "Please enter a valid 10-digit phone number",
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let instructions = self.special_instructions.trim();

        Ok(ValidatedDelivery {
            delivery_address: address.to_string(),
            phone_number: phone,
            payment_method: self.payment_method,
            special_instructions: (!instructions.is_empty()).then(|| instructions.to_string()),
        })
    }
}

/// Strip everything but ASCII digits.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
