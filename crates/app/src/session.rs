//! Per-user shopping session

use std::{sync::Arc, time::Duration};

use platter::{
    checkout::{DeliveryDetails, Order},
    coupons::CouponCatalog,
    menu::Restaurant,
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    auth::User,
    cart_store::CartStore,
    checkout::{CheckoutEntry, CheckoutError, CheckoutFlow},
    handoff::{Handoff, PageStorage, StorageError},
    orders::OrderSink,
};

/// Everything one signed-in user is working on: the selected restaurant, the
/// cart and the checkout flow. Each consumer receives it explicitly.
pub struct Session {
    cart: CartStore,
    restaurant: watch::Sender<Option<Restaurant>>,
    checkout: CheckoutFlow,
    storage: Arc<dyn PageStorage>,
}

impl Session {
    /// Start an empty session.
    #[must_use]
    pub fn new(
        coupons: Arc<CouponCatalog>,
        orders: Arc<dyn OrderSink>,
        storage: Arc<dyn PageStorage>,
        submit_timeout: Option<Duration>,
    ) -> Self {
        Self {
            cart: CartStore::new(coupons),
            restaurant: watch::Sender::new(None),
            checkout: CheckoutFlow::new(orders, submit_timeout),
            storage,
        }
    }

    /// Start a session from whatever was last handed off in page storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the stored hand-off cannot be read.
    pub fn resume(
        coupons: Arc<CouponCatalog>,
        orders: Arc<dyn OrderSink>,
        storage: Arc<dyn PageStorage>,
        submit_timeout: Option<Duration>,
    ) -> Result<Self, StorageError> {
        let handoff = Handoff::load(storage.as_ref())?;
        let session = Self::new(coupons, orders, storage, submit_timeout);

        session.cart.replace(handoff.to_cart(session.cart.coupons()));
        session.restaurant.send_replace(handoff.restaurant);

        Ok(session)
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    /// The restaurant whose menu is being ordered from.
    pub fn restaurant(&self) -> Option<Restaurant> {
        self.restaurant.borrow().clone()
    }

    /// Restaurant changes.
    pub fn subscribe_restaurant(&self) -> watch::Receiver<Option<Restaurant>> {
        self.restaurant.subscribe()
    }

    /// Open `restaurant`'s menu. A cart holding another restaurant's items is
    /// emptied, since an order can only come from one kitchen.
    pub fn select_restaurant(&self, restaurant: Restaurant) {
        let switching = self
            .restaurant
            .borrow()
            .as_ref()
            .is_some_and(|current| current.id != restaurant.id);

        if switching && !self.cart.is_empty() {
            info!(restaurant_id = %restaurant.id, "switching restaurant, emptying cart");
            self.cart.clear();
        }

        self.restaurant.send_replace(Some(restaurant));
    }

    /// Write the cart and restaurant to page storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the hand-off cannot be written.
    pub fn save(&self) -> Result<(), StorageError> {
        Handoff::capture(&self.cart.snapshot(), self.restaurant.borrow().as_ref())
            .save(self.storage.as_ref())
    }

    /// Hand the cart over to checkout and open the form.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Transition`] if checkout is already open.
    pub fn enter_checkout(&self) -> Result<CheckoutEntry, CheckoutError> {
        if let Err(error) = self.save() {
            warn!(%error, "failed to save checkout hand-off");
        }

        self.checkout.enter(&self.cart.snapshot())
    }

    /// Submit the checkout form for `customer`. A placed order empties the
    /// stored hand-off as well as the cart.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::submit`].
    pub async fn place_order(
        &self,
        customer: Option<&User>,
        details: &DeliveryDetails,
    ) -> Result<Order, CheckoutError> {
        let restaurant = self.restaurant();

        let order = self
            .checkout
            .submit(&self.cart, restaurant.as_ref(), customer, details)
            .await?;

        if let Err(error) = Handoff::clear(self.storage.as_ref()) {
            warn!(%error, "failed to clear checkout hand-off");
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use platter::{
        checkout::{CheckoutPhase, OrderId},
        menu::RestaurantId,
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        handoff::MemoryStorage,
        orders::{MockOrderSink, OrderSinkError},
        test::fixtures::{coupons, menu_item, restaurant},
    };

    use super::*;

    fn details() -> DeliveryDetails {
        DeliveryDetails {
            delivery_address: "1 Infinite Loop".to_string(),
            phone_number: "555-010-9999".to_string(),
            ..DeliveryDetails::default()
        }
    }

    #[test]
    fn entering_checkout_hands_off_cart_and_restaurant() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::new(
            coupons(),
            Arc::new(MockOrderSink::new()),
            storage.clone(),
            None,
        );
        session.select_restaurant(restaurant("Taqueria", Some(Decimal::new(199, 2))));
        session.cart().add_item(&menu_item("Taco", Decimal::from(3)));

        assert_eq!(session.enter_checkout()?, CheckoutEntry::Form);

        let resumed = Session::resume(coupons(), Arc::new(MockOrderSink::new()), storage, None)?;

        assert_eq!(resumed.cart().snapshot(), session.cart().snapshot());
        assert_eq!(
            resumed.restaurant().and_then(|r| r.delivery_fee),
            Some(Decimal::new(199, 2))
        );

        Ok(())
    }

    #[test]
    fn switching_restaurant_empties_the_cart() {
        let session = Session::new(
            coupons(),
            Arc::new(MockOrderSink::new()),
            Arc::new(MemoryStorage::new()),
            None,
        );
        session.select_restaurant(restaurant("Taqueria", None));
        session.cart().add_item(&menu_item("Taco", Decimal::from(3)));

        let mut other = restaurant("Sushi Bar", None);
        other.id = RestaurantId::now_v7();
        session.select_restaurant(other);

        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn placed_order_clears_the_hand_off() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        let mut orders = MockOrderSink::new();
        orders
            .expect_create_order()
            .returning(|_| Ok(OrderId::now_v7()));
        let session = Session::new(coupons(), Arc::new(orders), storage.clone(), None);
        session.cart().add_item(&menu_item("Taco", Decimal::from(3)));
        session.enter_checkout()?;

        session.place_order(None, &details()).await?;

        assert_eq!(Handoff::load(storage.as_ref())?, Handoff::default());
        assert!(matches!(session.checkout().phase(), CheckoutPhase::Confirmed(_)));

        Ok(())
    }

    #[tokio::test]
    async fn failed_order_keeps_the_hand_off() -> TestResult {
        let storage = Arc::new(MemoryStorage::new());
        let mut orders = MockOrderSink::new();
        orders
            .expect_create_order()
            .returning(|_| Err(OrderSinkError::Rejected("permission denied".to_string())));
        let session = Session::new(coupons(), Arc::new(orders), storage.clone(), None);
        session.cart().add_item(&menu_item("Taco", Decimal::from(3)));
        session.enter_checkout()?;

        assert!(session.place_order(None, &details()).await.is_err());
        assert_eq!(Handoff::load(storage.as_ref())?.lines.len(), 1);

        Ok(())
    }
}
