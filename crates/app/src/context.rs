//! App Context

use std::{sync::Arc, time::Duration};

use platter::coupons::{CatalogLoadError, CouponCatalog};
use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthProvider, SessionGate},
    backend::RestBackend,
    catalog::CatalogProvider,
    config::ClientConfig,
    handoff::{FileStorage, PageStorage, StorageError},
    orders::OrderSink,
    session::Session,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load coupon catalog")]
    Coupons(#[from] CatalogLoadError),
}

/// Collaborators shared by every session.
#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthProvider>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub orders: Arc<dyn OrderSink>,
    pub coupons: Arc<CouponCatalog>,
    pub storage: Arc<dyn PageStorage>,
    pub submit_timeout: Option<Duration>,
}

impl AppContext {
    /// Build application context backed by the hosted backend.
    ///
    /// # Errors
    ///
    /// Returns an error when a configured coupon catalog cannot be loaded.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppInitError> {
        let backend = Arc::new(RestBackend::new(config.backend.backend_config()));

        let coupons = match &config.checkout.coupons {
            Some(path) => {
                let catalog = CouponCatalog::load(path)?;
                info!(path = %path.display(), coupons = catalog.len(), "loaded coupon catalog");
                catalog
            }
            None => CouponCatalog::builtin(),
        };

        Ok(Self {
            auth: backend.clone(),
            catalog: backend.clone(),
            orders: backend,
            coupons: Arc::new(coupons),
            storage: Arc::new(FileStorage::new(&config.storage.storage_dir)),
            submit_timeout: config.checkout.submit_timeout(),
        })
    }

    /// Start following the signed-in identity. Needs a Tokio runtime.
    #[must_use]
    pub fn session_gate(&self) -> SessionGate {
        SessionGate::spawn(Arc::clone(&self.auth))
    }

    /// Pick up the session where the last view left it.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the stored hand-off cannot be read.
    pub fn resume_session(&self) -> Result<Session, StorageError> {
        Session::resume(
            Arc::clone(&self.coupons),
            Arc::clone(&self.orders),
            Arc::clone(&self.storage),
            self.submit_timeout,
        )
    }
}
