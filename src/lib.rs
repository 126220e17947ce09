//! Platter
//!
//! Platter is the domain core of a food-ordering client: the cart, its price
//! breakdown, coupon validation and the checkout state machine. It performs no
//! I/O; authentication, catalog queries and order persistence live behind the
//! capability traits of the `platter-app` crate.

pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod ids;
pub mod menu;
pub mod money;
pub mod prelude;
pub mod pricing;
