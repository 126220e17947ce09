//! Platter prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartCommand, CartLine, reduce},
    checkout::{
        CheckoutEvent, CheckoutPhase, DeliveryDetails, Field, FieldErrors, FormState,
        InvalidTransition, Order, OrderDraft, OrderId, OrderStatus, PaymentMethod,
        ValidatedDelivery, transition,
    },
    coupons::{Availability, Coupon, CouponCatalog, CouponRejection, DiscountKind, Offer},
    menu::{MenuItem, MenuItemId, Restaurant, RestaurantId},
    money::format_amount,
    pricing::{DEFAULT_DELIVERY_FEE, PriceBreakdown, price, tax_rate},
};
