//! Restaurant catalog

mod errors;
mod provider;

pub use errors::*;
pub use provider::*;
