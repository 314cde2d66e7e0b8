//! The keyed state store interface.
//!
//! [`StateStore`] is object-safe and deals in raw JSON text so it can sit
//! behind an `Arc<dyn StateStore>`. Typed access goes through the
//! [`StateStoreExt`] extension trait, which every store gets for free.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DbError;

/// A synchronous key-value store with read-your-writes consistency.
pub trait StateStore: Send + Sync {
    /// Read the JSON text stored at `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the key is invalid or the read fails.
    fn load_raw(&self, key: &str) -> Result<Option<String>, DbError>;

    /// Store JSON text at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the key is invalid or the write fails.
    fn save_raw(&self, key: &str, json: &str) -> Result<(), DbError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the key is invalid or the delete fails.
    fn delete(&self, key: &str) -> Result<(), DbError>;
}

/// Typed JSON helpers over any [`StateStore`].
pub trait StateStoreExt: StateStore {
    /// Serialize `value` as JSON and store it at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if serialization fails, or the
    /// store's write error.
    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), DbError> {
        let json = serde_json::to_string_pretty(value)?;
        self.save_raw(key, &json)
    }

    /// Read the value at `key` and deserialize it, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored text does not
    /// decode as `T`, or the store's read error.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        self.load_raw(key)?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(DbError::from)
    }

    /// Read the value at `key`, falling back to `fallback` if absent.
    ///
    /// # Errors
    ///
    /// Same as [`load_json`](Self::load_json); an absent key is not an
    /// error.
    fn load_or<T: DeserializeOwned>(&self, key: &str, fallback: T) -> Result<T, DbError> {
        Ok(self.load_json(key)?.unwrap_or(fallback))
    }
}

impl<S: StateStore + ?Sized> StateStoreExt for S {}

/// Check that `key` is a non-empty run of ASCII letters, digits, `_` or
/// `-`, so it maps onto a single file name on every platform.
///
/// # Errors
///
/// Returns [`DbError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> Result<(), DbError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidKey(key.to_owned()))
    }
}
