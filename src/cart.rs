//! Cart
//!
//! The cart owns the ordered list of lines for the active session and the
//! applied coupon. Every mutation is expressed as a [`CartCommand`] and
//! [`reduce`] is the single transition function, so all call sites keep the
//! same invariants:
//!
//! - at most one line per menu item;
//! - no line with a quantity of zero;
//! - a coupon is only ever applied after passing [`CouponCatalog::validate`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    coupons::{Coupon, CouponCatalog, CouponRejection},
    menu::{MenuItem, MenuItemId},
};

/// One distinct menu item and its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Menu item this line is for
    pub item_id: MenuItemId,

    /// Item name at the time it was added
    pub name: String,

    /// Unit price at the time it was added
    pub unit_price: Decimal,

    /// Always at least one
    pub quantity: u32,
}

impl CartLine {
    /// A single unit of `item`.
    pub fn new(item: &MenuItem) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 1,
        }
    }

    /// `unit_price × quantity`, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.unit_price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// A mutation of the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Add one unit of an item, creating its line if needed.
    AddItem(MenuItem),

    /// Remove an item's line. Removing an absent item does nothing.
    RemoveItem(MenuItemId),

    /// Replace an item's quantity; zero removes the line.
    SetQuantity(MenuItemId, u32),

    /// Empty the cart and drop the applied coupon.
    Clear,

    /// Validate a coupon code against the current subtotal and apply it.
    ApplyCoupon(String),

    /// Drop the applied coupon.
    RemoveCoupon,

    /// Take the lines of a placed order out of the cart.
    RemoveOrdered(Box<Cart>),
}

impl CartCommand {
    /// Increase an item's quantity by one, as the menu stepper does.
    pub fn increment(item_id: MenuItemId, current: u32) -> Self {
        Self::SetQuantity(item_id, current.saturating_add(1))
    }

    /// Decrease an item's quantity by one; at one this removes the line.
    pub fn decrement(item_id: MenuItemId, current: u32) -> Self {
        Self::SetQuantity(item_id, current.saturating_sub(1))
    }
}

/// The cart for the active session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    applied_coupon: Option<Coupon>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines, merging duplicate items and dropping
    /// zero quantities and negative prices.
    pub fn restore(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();

        for line in lines
            .into_iter()
            .filter(|line| line.quantity > 0 && line.unit_price >= Decimal::ZERO)
        {
            match cart.line_mut(line.item_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }

        cart
    }

    /// Add one unit of `item`.
    pub fn add_item(&mut self, item: &MenuItem) {
        match self.line_mut(item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(item)),
        }
    }

    /// Remove the line for `item_id`, if any.
    pub fn remove_item(&mut self, item_id: MenuItemId) {
        self.lines.retain(|line| line.item_id != item_id);
    }

    /// Set the quantity of an existing line. Zero removes it; unknown items are ignored.
    pub fn set_quantity(&mut self, item_id: MenuItemId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(item_id);
            return;
        }

        if let Some(line) = self.line_mut(item_id) {
            line.quantity = quantity;
        }
    }

    /// Empty the cart and drop the coupon.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.applied_coupon = None;
    }

    /// Subtract the quantities of `ordered` from the cart. Units added after
    /// `ordered` was taken stay, and its coupon is dropped.
    pub fn remove_ordered(&mut self, ordered: &Cart) {
        for placed in &ordered.lines {
            let remaining = self.quantity_of(placed.item_id).saturating_sub(placed.quantity);
            self.set_quantity(placed.item_id, remaining);
        }

        if ordered.applied_coupon.is_some() && self.applied_coupon == ordered.applied_coupon {
            self.applied_coupon = None;
        }
    }

    /// Validate `code` against the current subtotal and apply the coupon.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponRejection`] from the catalog; the cart is unchanged.
    pub fn apply_coupon(
        &mut self,
        coupons: &CouponCatalog,
        code: &str,
    ) -> Result<&Coupon, CouponRejection> {
        let coupon = coupons.validate(code, self.subtotal())?.clone();

        Ok(self.applied_coupon.insert(coupon))
    }

    /// Drop the applied coupon.
    pub fn remove_coupon(&mut self) {
        self.applied_coupon = None;
    }

    /// Apply a command in place.
    ///
    /// # Errors
    ///
    /// Only [`CartCommand::ApplyCoupon`] can fail; see [`Cart::apply_coupon`].
    pub fn apply(
        &mut self,
        command: CartCommand,
        coupons: &CouponCatalog,
    ) -> Result<(), CouponRejection> {
        match command {
            CartCommand::AddItem(item) => self.add_item(&item),
            CartCommand::RemoveItem(item_id) => self.remove_item(item_id),
            CartCommand::SetQuantity(item_id, quantity) => self.set_quantity(item_id, quantity),
            CartCommand::Clear => self.clear(),
            CartCommand::ApplyCoupon(code) => {
                self.apply_coupon(coupons, &code)?;
            }
            CartCommand::RemoveCoupon => self.remove_coupon(),
            CartCommand::RemoveOrdered(ordered) => self.remove_ordered(&ordered),
        }

        Ok(())
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The applied coupon, if any.
    pub fn applied_coupon(&self) -> Option<&Coupon> {
        self.applied_coupon.as_ref()
    }

    /// Quantity of `item_id` in the cart, zero if absent.
    pub fn quantity_of(&self, item_id: MenuItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| line.item_id == item_id)
            .map_or(0, |line| line.quantity)
    }

    /// Sum of all line quantities.
    pub fn total_item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of `unit_price × quantity` over all lines, saturating at [`Decimal::MAX`].
    pub fn subtotal(&self) -> Decimal {
        subtotal_of(&self.lines)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, item_id: MenuItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id == item_id)
    }
}

/// Sum of the line totals, saturating at [`Decimal::MAX`].
pub fn subtotal_of(lines: &[CartLine]) -> Decimal {
    lines
        .iter()
        .map(CartLine::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Compute the cart that results from applying `command` to `cart`.
///
/// # Errors
///
/// Returns a [`CouponRejection`] when a coupon code is rejected, in which case
/// the caller keeps `cart` as it was.
pub fn reduce(
    cart: &Cart,
    command: CartCommand,
    coupons: &CouponCatalog,
) -> Result<Cart, CouponRejection> {
    let mut next = cart.clone();

    next.apply(command, coupons)?;

    Ok(next)
}
