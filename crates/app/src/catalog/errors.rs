//! Catalog errors.

use platter::menu::{MenuItemId, RestaurantId};
use thiserror::Error;

use crate::errors::{BoxError, ErrorKind, UserFacing};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("restaurant {0} not found")]
    RestaurantNotFound(RestaurantId),

    #[error("menu item {0} not found")]
    MenuItemNotFound(MenuItemId),

    #[error("catalog unavailable")]
    Unavailable(#[source] BoxError),
}

impl UserFacing for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::RestaurantNotFound(_) | Self::MenuItemNotFound(_) => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::Remote,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::RestaurantNotFound(_) => "Restaurant not found".to_string(),
            Self::MenuItemNotFound(_) => "Menu item not found".to_string(),
            Self::Unavailable(_) => "Failed to load data. Please try again.".to_string(),
        }
    }
}
