//! Durable Key-Value Storage Abstraction
//!
//! The browser exposes `localStorage` as a synchronous, origin-scoped string
//! map that survives reloads and restarts. The shell reads its startup flags
//! out of it and writes whatever the application asks it to persist, so the
//! contract here mirrors that shape rather than an async settings API.

use crate::{error::Result, platform::PlatformSendSync};

/// Durable key-value storage trait
///
/// Implementations:
/// - **Web**: `window.localStorage`
/// - **Desktop / tests**: in-memory map
///
/// # Semantics
///
/// - `set_item` overwrites. Last write wins, there is no versioning.
/// - No transactions. Concurrent writers (other tabs, other processes) may
///   race and no reconciliation is attempted.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// fn remember_theme(store: &dyn KeyValueStore) -> Result<()> {
///     store.set_item("theme", "\"dark\"")
/// }
/// ```
pub trait KeyValueStore: PlatformSendSync {
    /// Read the raw string stored under `key`.
    ///
    /// Returns `Ok(None)` if the key was never written or has been removed.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Check whether a value is stored under `key`.
    fn has_item(&self, key: &str) -> Result<bool> {
        Ok(self.get_item(key)?.is_some())
    }

    /// Every stored key, in the store's own order.
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove every key starting with `prefix`. An empty prefix clears the
    /// whole store.
    fn clear(&self, prefix: &str) -> Result<()> {
        for key in self.keys()? {
            if key.starts_with(prefix) {
                self.remove_item(&key)?;
            }
        }
        Ok(())
    }
}
