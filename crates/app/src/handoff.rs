//! Local page storage and the menu-to-checkout hand-off.
//!
//! Each value is stored as JSON under a fixed key. There is no versioning: a
//! value that no longer parses is reported as [`StorageError::Decode`].

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use platter::{
    cart::{Cart, CartLine},
    coupons::CouponCatalog,
    menu::Restaurant,
};
use rustc_hash::FxHashMap;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::{ErrorKind, UNEXPECTED_MESSAGE, UserFacing};

/// Key holding the cart lines.
pub const CART_KEY: &str = "cart";

/// Key holding the selected restaurant.
pub const RESTAURANT_KEY: &str = "restaurant";

/// Key holding the applied coupon code.
pub const COUPON_KEY: &str = "coupon";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access stored {key}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("stored {key} is not valid")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {key}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl UserFacing for StorageError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Unexpected
    }

    fn user_message(&self) -> String {
        UNEXPECTED_MESSAGE.to_string()
    }
}

/// String key-value storage that outlives a single view.
pub trait PageStorage: Send + Sync {
    /// Stored value for `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Forget `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<FxHashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        entries.remove(key);

        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store files under `dir`, which is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PageStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_error = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_error)?;
        fs::write(self.path(key), value).map_err(io_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Cart contents and restaurant carried from the menu view to checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handoff {
    pub lines: Vec<CartLine>,
    pub restaurant: Option<Restaurant>,
    pub coupon_code: Option<String>,
}

impl Handoff {
    /// Capture the current cart and restaurant.
    pub fn capture(cart: &Cart, restaurant: Option<&Restaurant>) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            restaurant: restaurant.cloned(),
            coupon_code: cart.applied_coupon().map(|coupon| coupon.code.clone()),
        }
    }

    /// Read whatever was handed off. Missing keys read as empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if a stored value cannot be read or parsed.
    pub fn load(storage: &dyn PageStorage) -> Result<Self, StorageError> {
        Ok(Self {
            lines: read(storage, CART_KEY)?.unwrap_or_default(),
            restaurant: read(storage, RESTAURANT_KEY)?,
            coupon_code: read(storage, COUPON_KEY)?,
        })
    }

    /// Write every key, removing the ones with nothing to store.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if a value cannot be encoded or written.
    pub fn save(&self, storage: &dyn PageStorage) -> Result<(), StorageError> {
        write(storage, CART_KEY, Some(&self.lines))?;
        write(storage, RESTAURANT_KEY, self.restaurant.as_ref())?;
        write(storage, COUPON_KEY, self.coupon_code.as_ref())?;

        debug!(lines = self.lines.len(), "saved hand-off");

        Ok(())
    }

    /// Remove every hand-off key.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if a key cannot be removed.
    pub fn clear(storage: &dyn PageStorage) -> Result<(), StorageError> {
        for key in [CART_KEY, RESTAURANT_KEY, COUPON_KEY] {
            storage.remove(key)?;
        }

        Ok(())
    }

    /// Rebuild the cart. A stored coupon goes through validation again and is
    /// dropped if it no longer applies.
    pub fn to_cart(&self, coupons: &CouponCatalog) -> Cart {
        let mut cart = Cart::restore(self.lines.iter().cloned());

        if let Some(code) = &self.coupon_code
            && let Err(rejection) = cart.apply_coupon(coupons, code)
        {
            warn!(%code, %rejection, "dropping stored coupon");
        }

        cart
    }
}

fn read<T: DeserializeOwned>(
    storage: &dyn PageStorage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    storage
        .get(key)?
        .map(|value| {
            serde_json::from_str(&value).map_err(|source| StorageError::Decode {
                key: key.to_string(),
                source,
            })
        })
        .transpose()
}

fn write<T: Serialize>(
    storage: &dyn PageStorage,
    key: &str,
    value: Option<&T>,
) -> Result<(), StorageError> {
    let Some(value) = value else {
        return storage.remove(key);
    };

    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })?;

    storage.set(key, &encoded)
}
