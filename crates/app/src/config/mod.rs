//! Client configuration

use clap::Args;

use crate::config::{
    backend::BackendArgs, checkout::CheckoutConfig, observability::LoggingConfig,
    storage::StorageConfig,
};

pub mod backend;
pub mod checkout;
pub mod observability;
pub mod storage;

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct ClientConfig {
    /// Hosted backend connection.
    #[command(flatten)]
    pub backend: BackendArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Local page storage.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Checkout and coupon settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,
}
