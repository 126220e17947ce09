//! Request and response bodies.

use jiff::Timestamp;
use platter::{
    checkout::{Order, OrderStatus, PaymentMethod},
    menu::{MenuItemId, RestaurantId},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::User;

#[derive(Debug, Deserialize)]
pub(super) struct UserRow {
    id: Uuid,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email.unwrap_or_default(),
            full_name: row.user_metadata.full_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub user: UserRow,
}

/// Sign-up answers with a session when e-mail confirmation is off and with
/// the bare user when it is on.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponse {
    Session { user: UserRow },
    User(UserRow),
}

impl SignUpResponse {
    pub fn into_user(self) -> User {
        match self {
            Self::Session { user } | Self::User(user) => user.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ProfileRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub full_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderRow<'a> {
    id: Uuid,
    user_id: Option<Uuid>,
    restaurant_id: Option<RestaurantId>,
    subtotal: Decimal,
    delivery_fee: Decimal,
    tax: Decimal,
    discount: Decimal,
    total_amount: Decimal,
    coupon_code: Option<&'a str>,
    delivery_address: &'a str,
    phone_number: &'a str,
    payment_method: PaymentMethod,
    special_instructions: Option<&'a str>,
    status: OrderStatus,
    created_at: Timestamp,
    estimated_delivery: Timestamp,
}

impl<'a> From<&'a Order> for OrderRow<'a> {
    fn from(order: &'a Order) -> Self {
        let pricing = order.pricing().rounded();
        let delivery = order.delivery();

        Self {
            id: order.id().into_uuid(),
            user_id: order.customer_id(),
            restaurant_id: order.restaurant_id(),
            subtotal: pricing.subtotal,
            delivery_fee: pricing.delivery_fee,
            tax: pricing.tax,
            discount: pricing.discount,
            total_amount: pricing.total,
            coupon_code: order.coupon_code(),
            delivery_address: &delivery.delivery_address,
            phone_number: &delivery.phone_number,
            payment_method: delivery.payment_method,
            special_instructions: delivery.special_instructions.as_deref(),
            status: order.status(),
            created_at: order.placed_at(),
            estimated_delivery: order.estimated_delivery(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedRow {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub(super) struct OrderItemRow<'a> {
    pub order_id: Uuid,
    pub menu_item_id: MenuItemId,
    pub name: &'a str,
    pub unit_price: Decimal,
    pub quantity: u32,
}
