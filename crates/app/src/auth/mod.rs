//! Authentication

mod errors;
mod form;
mod gate;
mod models;
mod provider;

pub use errors::*;
pub use form::*;
pub use gate::*;
pub use models::*;
pub use provider::*;
