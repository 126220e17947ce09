//! Cart invariants under long mixed command sequences.
//!
//! Commands are drawn from a fixed linear congruential sequence so every run
//! replays the same carts.

use rust_decimal::Decimal;
use testresult::TestResult;
use uuid::Uuid;

use platter::{
    cart::{Cart, CartCommand, reduce},
    coupons::CouponCatalog,
    menu::{MenuItem, MenuItemId, RestaurantId},
};

const RESTAURANT: RestaurantId = RestaurantId::from_uuid(Uuid::from_u128(0xfeed));

fn item(seed: u128, cents: i64) -> MenuItem {
    MenuItem {
        id: MenuItemId::from_uuid(Uuid::from_u128(seed)),
        restaurant_id: RESTAURANT,
        name: format!("Dish {seed}"),
        description: None,
        price: Decimal::new(cents, 2),
        category: None,
        image_url: None,
        is_vegetarian: false,
        is_vegan: false,
        is_spicy: false,
    }
}

fn menu() -> Vec<MenuItem> {
    vec![
        item(1, 499),
        item(2, 1250),
        item(3, 75),
        item(4, 2000),
        item(5, 333),
    ]
}

struct Commands {
    state: u64,
    menu: Vec<MenuItem>,
}

impl Commands {
    fn new(seed: u64) -> Self {
        Self {
            state: seed,
            menu: menu(),
        }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        u32::try_from(self.state >> 33).unwrap_or_default()
    }

    fn pick(&mut self) -> MenuItem {
        let position = usize::try_from(self.next_u32()).unwrap_or_default() % self.menu.len();

        self.menu
            .get(position)
            .cloned()
            .unwrap_or_else(|| item(0, 100))
    }
}

impl Iterator for Commands {
    type Item = CartCommand;

    fn next(&mut self) -> Option<CartCommand> {
        let command = match self.next_u32() % 4 {
            0 | 1 => CartCommand::AddItem(self.pick()),
            2 => CartCommand::RemoveItem(self.pick().id),
            _ => {
                let quantity = self.next_u32() % 4;
                CartCommand::SetQuantity(self.pick().id, quantity)
            }
        };

        Some(command)
    }
}

fn assert_well_formed(cart: &Cart) {
    for (position, line) in cart.lines().iter().enumerate() {
        assert!(line.quantity > 0, "line {} has zero quantity", line.name);

        let duplicates = cart
            .lines()
            .iter()
            .skip(position + 1)
            .filter(|other| other.item_id == line.item_id)
            .count();

        assert_eq!(duplicates, 0, "{} appears on more than one line", line.name);
    }

    let expected: Decimal = cart
        .lines()
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum();

    assert_eq!(cart.subtotal(), expected, "subtotal drifted from lines");
}

#[test]
fn command_sequences_keep_the_cart_well_formed() -> TestResult {
    let coupons = CouponCatalog::builtin();

    for seed in [1, 7, 42, 2024, 99_991] {
        let mut cart = Cart::new();

        for command in Commands::new(seed).take(500) {
            cart = reduce(&cart, command, &coupons)?;
            assert_well_formed(&cart);
        }
    }

    Ok(())
}

#[test]
fn item_count_matches_line_quantities() -> TestResult {
    let coupons = CouponCatalog::builtin();
    let mut cart = Cart::new();

    for command in Commands::new(3).take(200) {
        cart = reduce(&cart, command, &coupons)?;

        let summed: u32 = cart.lines().iter().map(|line| line.quantity).sum();

        assert_eq!(cart.total_item_count(), summed, "badge count drifted");
    }

    Ok(())
}

#[test]
fn empty_cart_has_zero_subtotal() {
    let cart = Cart::new();

    assert_eq!(cart.subtotal(), Decimal::ZERO, "empty cart subtotal");
    assert_eq!(cart.total_item_count(), 0, "empty cart count");
}

#[test]
fn setting_zero_removes_the_line() -> TestResult {
    let coupons = CouponCatalog::builtin();
    let dish = item(9, 1000);

    let cart = reduce(&Cart::new(), CartCommand::AddItem(dish.clone()), &coupons)?;
    let cart = reduce(&cart, CartCommand::SetQuantity(dish.id, 0), &coupons)?;

    assert!(cart.is_empty(), "zero quantity left a line behind");

    Ok(())
}

#[test]
fn adding_twice_merges_into_one_line() -> TestResult {
    let coupons = CouponCatalog::builtin();
    let dish = item(10, 850);

    let cart = reduce(&Cart::new(), CartCommand::AddItem(dish.clone()), &coupons)?;
    let cart = reduce(&cart, CartCommand::AddItem(dish.clone()), &coupons)?;

    assert_eq!(cart.len(), 1, "one line per item");
    assert_eq!(cart.quantity_of(dish.id), 2, "quantities merge");
    assert_eq!(cart.subtotal(), Decimal::new(1700, 2), "subtotal of two");

    Ok(())
}
