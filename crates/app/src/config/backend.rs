//! Backend Config

use clap::Args;

use crate::backend::BackendConfig;

/// Hosted backend connection settings.
#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Backend project URL
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: String,

    /// Public anonymous API key
    #[arg(long, env = "BACKEND_ANON_KEY", hide_env_values = true)]
    pub backend_anon_key: String,
}

impl BackendArgs {
    #[must_use]
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            url: self.backend_url.clone(),
            anon_key: self.backend_anon_key.clone(),
        }
    }
}
