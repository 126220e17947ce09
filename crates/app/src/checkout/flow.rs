//! Checkout flow.

use std::{sync::Arc, time::Duration};

use jiff::Timestamp;
use platter::{
    cart::Cart,
    checkout::{
        CheckoutEvent, CheckoutPhase, DeliveryDetails, Field, InvalidTransition, Order,
        OrderDraft, OrderId, transition,
    },
    menu::Restaurant,
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::User, cart_store::CartStore, checkout::errors::CheckoutError, errors::UserFacing,
    orders::OrderSink,
};

/// Banner shown when a submission was abandoned before it finished.
const SUBMISSION_INTERRUPTED: &str = "Order submission was interrupted. Please try again.";

/// Result of opening checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutEntry {
    /// The delivery form is shown.
    Form,

    /// The cart was empty; the user is back to browsing.
    Redirected,
}

/// Drives one session through checkout and owns its phase.
///
/// Only one submission can be in flight at a time: a second submit while the
/// first is validating or waiting on the order sink fails with
/// [`CheckoutError::InFlight`].
pub struct CheckoutFlow {
    orders: Arc<dyn OrderSink>,
    submit_timeout: Option<Duration>,
    phase: watch::Sender<CheckoutPhase>,
}

impl CheckoutFlow {
    #[must_use]
    pub fn new(orders: Arc<dyn OrderSink>, submit_timeout: Option<Duration>) -> Self {
        Self {
            orders,
            submit_timeout,
            phase: watch::Sender::new(CheckoutPhase::Browsing),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> CheckoutPhase {
        self.phase.borrow().clone()
    }

    /// Phase changes, e.g. to disable the submit control while submitting.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutPhase> {
        self.phase.subscribe()
    }

    /// The order for the confirmation view. `None` sends the view back to
    /// browsing.
    pub fn confirmed_order(&self) -> Option<Order> {
        self.phase.borrow().order().cloned()
    }

    /// Open checkout for `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transition`] if checkout is already open.
    pub fn enter(&self, cart: &Cart) -> Result<CheckoutEntry, CheckoutError> {
        let next = self.advance(CheckoutEvent::Enter {
            cart_is_empty: cart.is_empty(),
        })?;

        if matches!(next, CheckoutPhase::Browsing) {
            debug!("checkout opened with an empty cart");

            return Ok(CheckoutEntry::Redirected);
        }

        Ok(CheckoutEntry::Form)
    }

    /// The user edited `field`; its error goes away.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transition`] unless the form is shown.
    pub fn edit(&self, field: Field) -> Result<(), CheckoutError> {
        self.advance(CheckoutEvent::Edit(field))?;

        Ok(())
    }

    /// Close the form and go back to browsing.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transition`] unless the form is shown.
    pub fn leave(&self) -> Result<(), CheckoutError> {
        self.advance(CheckoutEvent::Leave)?;

        Ok(())
    }

    /// Dismiss the confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transition`] unless an order was confirmed.
    pub fn finish(&self) -> Result<(), CheckoutError> {
        self.advance(CheckoutEvent::Finish)?;

        Ok(())
    }

    /// Validate `details`, snapshot the cart and store the order.
    ///
    /// On success the cart is cleared and the phase is
    /// [`CheckoutPhase::Confirmed`]. On any failure the cart is left alone and
    /// the form is shown again, with field errors or a banner.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Invalid`] for bad delivery details,
    /// [`CheckoutError::InFlight`] while another submission is running, and
    /// [`CheckoutError::Persist`] or [`CheckoutError::TimedOut`] when the
    /// order could not be stored.
    #[instrument(skip_all, fields(items = cart.total_item_count()))]
    pub async fn submit(
        &self,
        cart: &CartStore,
        restaurant: Option<&Restaurant>,
        customer: Option<&User>,
        details: &DeliveryDetails,
    ) -> Result<Order, CheckoutError> {
        self.advance(CheckoutEvent::Submit).map_err(|error| {
            if matches!(
                *self.phase.borrow(),
                CheckoutPhase::Validating | CheckoutPhase::Submitting
            ) {
                CheckoutError::InFlight
            } else {
                CheckoutError::Transition(error)
            }
        })?;

        let mut submission = Submission::new(self);

        let delivery = match details.validate() {
            Ok(delivery) => delivery,
            Err(errors) => {
                debug!(fields = errors.len(), "delivery details rejected");
                submission.settle(CheckoutEvent::Rejected(errors.clone()))?;

                return Err(CheckoutError::Invalid(errors));
            }
        };

        self.advance(CheckoutEvent::Accepted)?;

        let snapshot = cart.snapshot();
        if snapshot.is_empty() {
            return Err(submission.fail(CheckoutError::EmptyCart));
        }

        let draft = OrderDraft::snapshot(
            &snapshot,
            restaurant,
            customer.map(|user| user.id),
            delivery,
        );

        let order = match Order::place(OrderId::now_v7(), draft, Timestamp::now()) {
            Ok(order) => order,
            Err(error) => return Err(submission.fail(CheckoutError::Clock(error))),
        };

        let id = match self.persist(&order).await {
            Ok(id) => id,
            Err(error) => {
                warn!(%error, "order submission failed");

                return Err(submission.fail(error));
            }
        };

        let order = order.with_id(id);

        cart.remove_ordered(&snapshot);
        submission.settle(CheckoutEvent::Persisted(Box::new(order.clone())))?;

        info!(
            order_id = %order.id(),
            total = %order.pricing().total,
            "order placed"
        );

        Ok(order)
    }

    async fn persist(&self, order: &Order) -> Result<OrderId, CheckoutError> {
        let create = self.orders.create_order(order);

        let result = match self.submit_timeout {
            Some(limit) => tokio::time::timeout(limit, create)
                .await
                .map_err(|_elapsed| CheckoutError::TimedOut(limit))?,
            None => create.await,
        };

        result.map_err(CheckoutError::Persist)
    }

    fn advance(&self, event: CheckoutEvent) -> Result<CheckoutPhase, InvalidTransition> {
        let mut outcome = None;

        self.phase.send_if_modified(|phase| {
            let from = phase.name();

            match transition(phase, event) {
                Ok(next) => {
                    debug!(from, to = next.name(), "checkout transition");
                    *phase = next.clone();
                    outcome = Some(Ok(next));
                    true
                }
                Err(error) => {
                    outcome = Some(Err(error));
                    false
                }
            }
        });

        outcome.unwrap_or_else(|| Ok(self.phase()))
    }
}

/// An in-flight submission. Dropping it before it settles puts the form back.
struct Submission<'a> {
    flow: &'a CheckoutFlow,
    settled: bool,
}

impl<'a> Submission<'a> {
    fn new(flow: &'a CheckoutFlow) -> Self {
        Self {
            flow,
            settled: false,
        }
    }

    fn settle(&mut self, event: CheckoutEvent) -> Result<CheckoutPhase, InvalidTransition> {
        self.settled = true;

        self.flow.advance(event)
    }

    fn fail(&mut self, error: CheckoutError) -> CheckoutError {
        if let Err(transition) = self.settle(CheckoutEvent::Failed(error.user_message())) {
            warn!(%transition, "could not return to the form");
        }

        error
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        if let Err(transition) = self
            .flow
            .advance(CheckoutEvent::Failed(SUBMISSION_INTERRUPTED.to_string()))
        {
            debug!(%transition, "abandoned submission left checkout as it was");
        }
    }
}
