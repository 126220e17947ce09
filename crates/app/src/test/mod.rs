//! Shared test fixtures.

pub(crate) mod fixtures;
