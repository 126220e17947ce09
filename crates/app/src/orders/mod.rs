//! Order persistence

mod errors;
mod sink;

pub use errors::*;
pub use sink::*;
