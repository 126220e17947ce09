//! Catalog tables.

use async_trait::async_trait;
use platter::menu::{MenuItem, Restaurant, RestaurantId};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    backend::{BackendError, RestBackend, check},
    catalog::{CatalogError, CatalogProvider},
};

#[async_trait]
impl CatalogProvider for RestBackend {
    #[instrument(skip(self))]
    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
        let restaurants: Vec<Restaurant> = self
            .select("rest/v1/restaurants?select=*&is_active=eq.true&order=rating.desc")
            .await?;

        debug!(count = restaurants.len(), "loaded restaurants");

        Ok(restaurants)
    }

    #[instrument(skip(self))]
    async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant, CatalogError> {
        let restaurants: Vec<Restaurant> = self
            .select(&format!("rest/v1/restaurants?select=*&id=eq.{id}"))
            .await?;

        restaurants
            .into_iter()
            .next()
            .ok_or(CatalogError::RestaurantNotFound(id))
    }

    #[instrument(skip(self))]
    async fn list_menu_items(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, CatalogError> {
        let items: Vec<MenuItem> = self
            .select(&format!(
                "rest/v1/menu_items?select=*&restaurant_id=eq.{restaurant_id}&is_available=eq.true"
            ))
            .await?;

        debug!(count = items.len(), "loaded menu");

        Ok(items)
    }
}

impl RestBackend {
    async fn select<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self.request(Method::GET, path).send().await?;

        Ok(check(response).await?.json().await?)
    }
}
