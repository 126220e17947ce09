//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Where the cart and restaurant hand-off is kept between commands.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory for local page storage
    #[arg(long, env = "PLATTER_STORAGE_DIR", default_value = ".platter")]
    pub storage_dir: PathBuf,
}
