//! Restaurants and menus

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::TypedUuid;

/// Restaurant id
pub type RestaurantId = TypedUuid<Restaurant>;

/// Menu item id
pub type MenuItemId = TypedUuid<MenuItem>;

/// Category name that matches every menu item.
pub const ALL_CATEGORIES: &str = "all";

/// A restaurant listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Restaurant id
    pub id: RestaurantId,

    /// Display name
    pub name: String,

    /// Cuisine label, e.g. "Italian"
    #[serde(default)]
    pub cuisine: Option<String>,

    /// Average rating
    #[serde(default)]
    pub rating: Option<Decimal>,

    /// Human readable delivery window, e.g. "25-35 min"
    #[serde(default)]
    pub delivery_time: Option<String>,

    /// Delivery fee charged by this restaurant. `None` means the default fee applies.
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,

    /// Cover image
    #[serde(default)]
    pub image_url: Option<String>,
}

/// An orderable item on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Menu item id
    pub id: MenuItemId,

    /// Owning restaurant
    pub restaurant_id: RestaurantId,

    /// Display name
    pub name: String,

    /// Long description
    #[serde(default)]
    pub description: Option<String>,

    /// Unit price
    pub price: Decimal,

    /// Menu section, e.g. "Mains"
    #[serde(default)]
    pub category: Option<String>,

    /// Image
    #[serde(default)]
    pub image_url: Option<String>,

    /// Vegetarian badge
    #[serde(default)]
    pub is_vegetarian: bool,

    /// Vegan badge
    #[serde(default)]
    pub is_vegan: bool,

    /// Spicy badge
    #[serde(default)]
    pub is_spicy: bool,
}

impl MenuItem {
    /// Whether the item belongs to `category`. [`ALL_CATEGORIES`] matches everything.
    pub fn in_category(&self, category: &str) -> bool {
        category == ALL_CATEGORIES || self.category.as_deref() == Some(category)
    }
}

/// Category tabs for a menu: `"all"` first, then each distinct category in the
/// order it first appears.
pub fn categories(items: &[MenuItem]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];

    for category in items.iter().filter_map(|item| item.category.as_deref()) {
        if !categories.iter().any(|known| known == category) {
            categories.push(category.to_string());
        }
    }

    categories
}

/// Menu items visible under the selected category tab.
pub fn filter_by_category<'a>(
    items: &'a [MenuItem],
    category: &'a str,
) -> impl Iterator<Item = &'a MenuItem> {
    items.iter().filter(move |item| item.in_category(category))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal::Decimal;

    use super::*;

    pub(crate) fn restaurant(delivery_fee: Option<Decimal>) -> Restaurant {
        Restaurant {
            id: RestaurantId::now_v7(),
            name: "Trattoria Uno".to_string(),
            cuisine: Some("Italian".to_string()),
            rating: Some(Decimal::new(45, 1)),
            delivery_time: Some("25-35 min".to_string()),
            delivery_fee,
            image_url: None,
        }
    }

    pub(crate) fn menu_item(name: &str, price: Decimal, category: Option<&str>) -> MenuItem {
        MenuItem {
            id: MenuItemId::now_v7(),
            restaurant_id: RestaurantId::now_v7(),
            name: name.to_string(),
            description: None,
            price,
            category: category.map(str::to_string),
            image_url: None,
            is_vegetarian: false,
            is_vegan: false,
            is_spicy: false,
        }
    }
}
