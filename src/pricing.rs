//! Pricing
//!
//! Price breakdowns are derived from the cart on every read and never stored.
//! All arithmetic keeps full [`Decimal`] precision; rounding to cents happens
//! only in [`PriceBreakdown::rounded`] and the [`Display`](fmt::Display) impl.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    cart::{Cart, CartLine, subtotal_of},
    coupons::{Coupon, DiscountKind},
    menu::Restaurant,
    money::{format_amount, round_cents},
};

/// Delivery fee used when a restaurant does not set its own: 2.99.
pub const DEFAULT_DELIVERY_FEE: Decimal = Decimal::from_parts(299, 0, 0, false, 2);

/// Sales tax applied to the subtotal: 8%.
pub fn tax_rate() -> Percentage {
    Percentage::from(Decimal::new(8, 2))
}

/// The five components of the displayed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Sum of line totals
    pub subtotal: Decimal,

    /// Delivery fee charged by the restaurant
    pub delivery_fee: Decimal,

    /// Tax on the subtotal
    pub tax: Decimal,

    /// Coupon discount, never more than subtotal plus delivery fee
    pub discount: Decimal,

    /// `subtotal + delivery_fee + tax - discount`, never negative
    pub total: Decimal,
}

impl PriceBreakdown {
    /// Price a cart for a restaurant, using the cart's applied coupon.
    pub fn for_cart(cart: &Cart, restaurant: Option<&Restaurant>) -> Self {
        price(
            cart.lines(),
            restaurant.and_then(|restaurant| restaurant.delivery_fee),
            cart.applied_coupon(),
        )
    }

    /// Every component rounded to cents, for presentation.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_cents(self.subtotal),
            delivery_fee: round_cents(self.delivery_fee),
            tax: round_cents(self.tax),
            discount: round_cents(self.discount),
            total: round_cents(self.total),
        }
    }

    /// Whether a discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount > Decimal::ZERO
    }
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subtotal      {}", format_amount(self.subtotal))?;
        writeln!(f, "Delivery fee  {}", format_amount(self.delivery_fee))?;
        writeln!(f, "Tax           {}", format_amount(self.tax))?;

        if self.has_discount() {
            writeln!(f, "Discount     -{}", format_amount(self.discount))?;
        }

        write!(f, "Total         {}", format_amount(self.total))
    }
}

/// Price a list of cart lines.
///
/// `delivery_fee` falls back to [`DEFAULT_DELIVERY_FEE`] when `None`.
pub fn price(
    lines: &[CartLine],
    delivery_fee: Option<Decimal>,
    coupon: Option<&Coupon>,
) -> PriceBreakdown {
    let subtotal = subtotal_of(lines);
    let delivery_fee = delivery_fee.unwrap_or(DEFAULT_DELIVERY_FEE);
    let tax = tax_rate() * subtotal;

    let discount = coupon
        .map_or(Decimal::ZERO, |coupon| {
            discount_for(coupon, subtotal, delivery_fee)
        })
        .min(subtotal.saturating_add(delivery_fee));

    let total = subtotal
        .saturating_add(delivery_fee)
        .saturating_add(tax)
        .saturating_sub(discount)
        .max(Decimal::ZERO);

    PriceBreakdown {
        subtotal,
        delivery_fee,
        tax,
        discount,
        total,
    }
}

/// Discount a coupon gives on `subtotal` when `delivery_fee` would be charged.
pub fn discount_for(coupon: &Coupon, subtotal: Decimal, delivery_fee: Decimal) -> Decimal {
    match coupon.kind {
        DiscountKind::PercentageOfSubtotal => {
            (Percentage::from(coupon.value) * subtotal).min(subtotal)
        }
        DiscountKind::FixedAmount => coupon.value.min(subtotal),
        DiscountKind::WaiveDeliveryFee => delivery_fee,
    }
}
