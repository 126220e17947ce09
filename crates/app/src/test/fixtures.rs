//! Catalog fixtures.

use std::sync::Arc;

use platter::{
    coupons::CouponCatalog,
    menu::{MenuItem, MenuItemId, Restaurant, RestaurantId},
};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Restaurant every fixture item belongs to.
pub(crate) const RESTAURANT_ID: RestaurantId =
    RestaurantId::from_uuid(Uuid::from_u128(0x0192_f3a4_5b6c_7d8e_9f00_1122_3344_5566));

pub(crate) fn restaurant(name: &str, delivery_fee: Option<Decimal>) -> Restaurant {
    Restaurant {
        id: RESTAURANT_ID,
        name: name.to_string(),
        cuisine: Some("Fusion".to_string()),
        rating: Some(Decimal::new(45, 1)),
        delivery_time: Some("25-35 min".to_string()),
        delivery_fee,
        image_url: None,
    }
}

/// A menu item whose id is derived from its name, so adding the same name
/// twice hits the same cart line.
pub(crate) fn menu_item(name: &str, price: Decimal) -> MenuItem {
    MenuItem {
        id: MenuItemId::from_uuid(Uuid::from_u128(
            name.bytes()
                .fold(1_u128, |id, byte| id.wrapping_mul(31).wrapping_add(u128::from(byte))),
        )),
        restaurant_id: RESTAURANT_ID,
        name: name.to_string(),
        description: None,
        price,
        category: Some("Mains".to_string()),
        image_url: None,
        is_vegetarian: false,
        is_vegan: false,
        is_spicy: false,
    }
}

pub(crate) fn coupons() -> Arc<CouponCatalog> {
    Arc::new(CouponCatalog::builtin())
}
