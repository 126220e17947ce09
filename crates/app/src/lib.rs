//! Platter application layer: collaborators, sessions and checkout.

pub mod auth;
pub mod backend;
pub mod cart_store;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod errors;
pub mod handoff;
pub mod observability;
pub mod orders;
pub mod session;

#[cfg(test)]
mod test;
