//! Orders

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cart::{Cart, CartLine},
    checkout::form::{PaymentMethod, ValidatedDelivery},
    ids::TypedUuid,
    menu::{Restaurant, RestaurantId},
    pricing::PriceBreakdown,
};

/// Order id
pub type OrderId = TypedUuid<Order>;

/// How long after submission an order is expected to arrive.
pub const DELIVERY_ESTIMATE_MINUTES: i64 = 45;

/// Display-only progress of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Accepted by the restaurant
    #[default]
    Confirmed,

    /// Being cooked
    Preparing,

    /// With the courier
    OutForDelivery,

    /// Handed over
    Delivered,
}

impl OrderStatus {
    /// Every status in progression order.
    pub const PROGRESSION: [Self; 4] = [
        Self::Confirmed,
        Self::Preparing,
        Self::OutForDelivery,
        Self::Delivered,
    ];

    /// Status label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Confirmed => "Order Confirmed",
            Self::Preparing => "Preparing",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything captured from the session at the moment of submission.
///
/// Built from a borrowed cart, so later cart mutations cannot reach an order
/// that is already being submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    /// Restaurant the order is for
    pub restaurant_id: Option<RestaurantId>,

    /// Signed-in customer
    pub customer_id: Option<Uuid>,

    /// Snapshot of the cart lines
    pub lines: Vec<CartLine>,

    /// Snapshot of the price
    pub pricing: PriceBreakdown,

    /// Applied coupon code, if any
    pub coupon_code: Option<String>,

    /// Validated delivery details
    pub delivery: ValidatedDelivery,
}

impl OrderDraft {
    /// Snapshot a cart and its price for the given restaurant.
    pub fn snapshot(
        cart: &Cart,
        restaurant: Option<&Restaurant>,
        customer_id: Option<Uuid>,
        delivery: ValidatedDelivery,
    ) -> Self {
        Self {
            restaurant_id: restaurant.map(|restaurant| restaurant.id),
            customer_id,
            lines: cart.lines().to_vec(),
            pricing: PriceBreakdown::for_cart(cart, restaurant),
            coupon_code: cart.applied_coupon().map(|coupon| coupon.code.clone()),
            delivery,
        }
    }
}

/// A submitted order. Immutable once placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    restaurant_id: Option<RestaurantId>,
    customer_id: Option<Uuid>,
    lines: Vec<CartLine>,
    pricing: PriceBreakdown,
    coupon_code: Option<String>,
    delivery: ValidatedDelivery,
    status: OrderStatus,
    placed_at: Timestamp,
    estimated_delivery: Timestamp,
}

impl Order {
    /// Place an order from a draft at `placed_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`jiff::Error`] if the delivery estimate overflows the timestamp range.
    pub fn place(id: OrderId, draft: OrderDraft, placed_at: Timestamp) -> Result<Self, jiff::Error> {
        let estimated_delivery =
            placed_at.checked_add(SignedDuration::from_mins(DELIVERY_ESTIMATE_MINUTES))?;

        Ok(Self {
            id,
            restaurant_id: draft.restaurant_id,
            customer_id: draft.customer_id,
            lines: draft.lines,
            pricing: draft.pricing,
            coupon_code: draft.coupon_code,
            delivery: draft.delivery,
            status: OrderStatus::Confirmed,
            placed_at,
            estimated_delivery,
        })
    }

    /// The same order under the id the backend stored it with.
    #[must_use]
    pub fn with_id(self, id: OrderId) -> Self {
        Self { id, ..self }
    }

    /// Order id
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Restaurant the order is for
    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        self.restaurant_id
    }

    /// Customer who placed the order
    pub fn customer_id(&self) -> Option<Uuid> {
        self.customer_id
    }

    /// Ordered lines
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Price at submission
    pub fn pricing(&self) -> &PriceBreakdown {
        &self.pricing
    }

    /// Applied coupon code
    pub fn coupon_code(&self) -> Option<&str> {
        self.coupon_code.as_deref()
    }

    /// Delivery details
    pub fn delivery(&self) -> &ValidatedDelivery {
        &self.delivery
    }

    /// Payment method
    pub fn payment_method(&self) -> PaymentMethod {
        self.delivery.payment_method
    }

    /// Current status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Submission time
    pub fn placed_at(&self) -> Timestamp {
        self.placed_at
    }

    /// Expected arrival
    pub fn estimated_delivery(&self) -> Timestamp {
        self.estimated_delivery
    }

    /// Whole minutes until the estimated delivery, rounded up; `None` once due.
    pub fn minutes_until_delivery(&self, now: Timestamp) -> Option<i64> {
        let seconds = self.estimated_delivery.duration_since(now).as_secs();

        (seconds > 0).then(|| (seconds + 59) / 60)
    }
}
