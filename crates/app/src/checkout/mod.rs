//! Checkout orchestration

mod errors;
mod flow;

pub use errors::*;
pub use flow::*;
