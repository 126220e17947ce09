//! Observable cart store

use std::sync::Arc;

use platter::{
    cart::{Cart, CartCommand, reduce},
    coupons::{Coupon, CouponCatalog, CouponRejection},
    menu::{MenuItem, MenuItemId, Restaurant},
    pricing::PriceBreakdown,
};
use tokio::sync::watch;
use tracing::debug;

/// Owns the session's cart. Every command goes through [`reduce`] and the new
/// cart is published to subscribers before the command returns.
#[derive(Debug)]
pub struct CartStore {
    state: watch::Sender<Cart>,
    coupons: Arc<CouponCatalog>,
}

impl CartStore {
    #[must_use]
    pub fn new(coupons: Arc<CouponCatalog>) -> Self {
        Self::with_cart(Cart::new(), coupons)
    }

    /// Start from an existing cart, e.g. one restored from page storage.
    #[must_use]
    pub fn with_cart(cart: Cart, coupons: Arc<CouponCatalog>) -> Self {
        Self {
            state: watch::Sender::new(cart),
            coupons,
        }
    }

    /// Apply a command. Observers see the new cart once this returns.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponRejection`] for a rejected coupon code; the cart is
    /// left as it was.
    pub fn dispatch(&self, command: CartCommand) -> Result<(), CouponRejection> {
        let name = command_name(&command);

        let next = {
            let current = self.state.borrow();
            reduce(&current, command, &self.coupons)?
        };

        debug!(
            command = name,
            lines = next.len(),
            items = next.total_item_count(),
            "cart updated"
        );

        self.state.send_replace(next);

        Ok(())
    }

    pub fn add_item(&self, item: &MenuItem) {
        self.dispatch_infallible(CartCommand::AddItem(item.clone()));
    }

    pub fn remove_item(&self, item_id: MenuItemId) {
        self.dispatch_infallible(CartCommand::RemoveItem(item_id));
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_quantity(&self, item_id: MenuItemId, quantity: u32) {
        self.dispatch_infallible(CartCommand::SetQuantity(item_id, quantity));
    }

    /// Empty the cart and drop the coupon.
    pub fn clear(&self) {
        self.dispatch_infallible(CartCommand::Clear);
    }

    /// Validate and apply a coupon code against the current subtotal.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponRejection`]; any previously applied coupon stays.
    pub fn apply_coupon(&self, code: &str) -> Result<Coupon, CouponRejection> {
        self.dispatch(CartCommand::ApplyCoupon(code.to_string()))?;

        self.state
            .borrow()
            .applied_coupon()
            .cloned()
            .ok_or(CouponRejection::NotFound)
    }

    pub fn remove_coupon(&self) {
        self.dispatch_infallible(CartCommand::RemoveCoupon);
    }

    /// Take a placed order's lines out of the cart, keeping anything added since.
    pub fn remove_ordered(&self, ordered: &Cart) {
        self.dispatch_infallible(CartCommand::RemoveOrdered(Box::new(ordered.clone())));
    }

    /// Replace the whole cart.
    pub fn replace(&self, cart: Cart) {
        self.state.send_replace(cart);
    }

    /// A copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Cart changes, for the sidebar, the badge and the checkout summary.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    pub fn total_item_count(&self) -> u32 {
        self.state.borrow().total_item_count()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Price the current cart for `restaurant`.
    pub fn price(&self, restaurant: Option<&Restaurant>) -> PriceBreakdown {
        PriceBreakdown::for_cart(&self.state.borrow(), restaurant)
    }

    /// The catalog coupons are validated against.
    pub fn coupons(&self) -> &CouponCatalog {
        &self.coupons
    }

    fn dispatch_infallible(&self, command: CartCommand) {
        if let Err(rejection) = self.dispatch(command) {
            debug!(%rejection, "cart command rejected");
        }
    }
}

fn command_name(command: &CartCommand) -> &'static str {
    match command {
        CartCommand::AddItem(_) => "add_item",
        CartCommand::RemoveItem(_) => "remove_item",
        CartCommand::SetQuantity(..) => "set_quantity",
        CartCommand::Clear => "clear",
        CartCommand::ApplyCoupon(_) => "apply_coupon",
        CartCommand::RemoveCoupon => "remove_coupon",
        CartCommand::RemoveOrdered(_) => "remove_ordered",
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::test::fixtures::menu_item;

    use super::*;

    fn store() -> CartStore {
        CartStore::new(Arc::new(CouponCatalog::builtin()))
    }

    #[tokio::test]
    async fn observers_see_every_mutation() -> TestResult {
        let store = store();
        let mut observer = store.subscribe();
        let pizza = menu_item("Pizza", Decimal::from(12));

        store.add_item(&pizza);
        observer.changed().await?;
        assert_eq!(observer.borrow_and_update().total_item_count(), 1);

        store.set_quantity(pizza.id, 3);
        observer.changed().await?;
        assert_eq!(observer.borrow_and_update().total_item_count(), 3);

        Ok(())
    }

    #[test]
    fn rejected_coupon_leaves_cart_untouched() {
        let store = store();
        store.add_item(&menu_item("Fries", Decimal::from(4)));
        let before = store.snapshot();

        let result = store.apply_coupon("WELCOME10");

        assert!(matches!(result, Err(CouponRejection::BelowMinimum { .. })));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn rejected_coupon_keeps_previous_coupon() -> TestResult {
        let store = store();
        store.add_item(&menu_item("Feast", Decimal::from(30)));
        store.apply_coupon("SAVE5")?;

        assert!(store.apply_coupon("NOPE").is_err());
        assert_eq!(
            store.snapshot().applied_coupon().map(|c| c.code.as_str()),
            Some("SAVE5")
        );

        Ok(())
    }

    #[test]
    fn clear_drops_lines_and_coupon() -> TestResult {
        let store = store();
        store.add_item(&menu_item("Feast", Decimal::from(30)));
        store.apply_coupon("save5")?;

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.snapshot().applied_coupon(), None);

        Ok(())
    }

    #[test]
    fn price_tracks_the_current_cart() {
        let store = store();
        store.add_item(&menu_item("Steak", Decimal::from(40)));

        assert_eq!(store.price(None).rounded().total, Decimal::new(4619, 2));
    }
}
