//! Checkout
//!
//! Delivery form validation, the order snapshot taken at submission, and the
//! state machine that drives a session from browsing to a confirmed order.

pub mod form;
pub mod machine;
pub mod order;

pub use form::{DeliveryDetails, Field, FieldErrors, PaymentMethod, ValidatedDelivery};
pub use machine::{CheckoutEvent, CheckoutPhase, FormState, InvalidTransition, transition};
pub use order::{Order, OrderDraft, OrderId, OrderStatus};
