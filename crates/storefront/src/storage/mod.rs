//! Key-value storage for the persisted cart.
//!
//! The cart lives under a single key as a string value. Backends only store
//! and return strings; they never interpret the cart format.
//!
//! # Backends
//!
//! - [`FileStore`] - one file per key under a directory, survives restarts
//! - [`MemoryStore`] - in-process map for tests and ephemeral runs

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors from storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The value does not fit in the remaining quota.
    #[error("storage quota exceeded: {size} bytes requested, limit is {limit}")]
    QuotaExceeded { size: usize, limit: usize },

    /// The key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Storage backend is disabled or otherwise unavailable.
    #[error("storage is unavailable")]
    Unavailable,
}

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Synchronous string key-value store.
///
/// Implementations must satisfy:
/// - `get` after a successful `set` on the same key returns the written value.
/// - A failed `set` leaves the previous value in place.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// Check a key is non-empty and limited to `[A-Za-z0-9_.-]`, not starting with a dot.
///
/// # Errors
///
/// Returns `StoreError::InvalidKey` otherwise.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Check a value fits in `quota` bytes. `None` means unlimited.
fn check_quota(value: &str, quota: Option<usize>) -> StoreResult<()> {
    match quota {
        Some(limit) if value.len() > limit => Err(StoreError::QuotaExceeded {
            size: value.len(),
            limit,
        }),
        _ => Ok(()),
    }
}
