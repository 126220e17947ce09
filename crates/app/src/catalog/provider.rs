//! Catalog provider.

use async_trait::async_trait;
use mockall::automock;
use platter::menu::{MenuItem, Restaurant, RestaurantId};

use crate::catalog::errors::CatalogError;

#[automock]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Active restaurants, best rated first.
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, CatalogError>;

    /// A single restaurant.
    async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant, CatalogError>;

    /// Available items on a restaurant's menu.
    async fn list_menu_items(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, CatalogError>;
}
