//! `localStorage`-backed durable key-value store.
//!
//! Keys are used as-is (no namespace prefix) so the values written here are
//! the same ones the application's startup flags are read from.

use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    storage::KeyValueStore,
};
use wasm_bindgen::JsValue;

use crate::error::describe_js_value;

fn js_error(context: &str, err: JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!(
        "localStorage {context}: {}",
        describe_js_value(&err)
    ))
}

fn local_storage() -> BridgeResult<web_sys::Storage> {
    let window = web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".into()))?;
    window
        .local_storage()
        .map_err(|err| js_error("access", err))?
        .ok_or_else(|| BridgeError::NotAvailable("localStorage".into()))
}

#[derive(Clone)]
/// Browser `localStorage` exposed as a [`KeyValueStore`].
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Bind to the page's `localStorage`.
    pub fn new() -> BridgeResult<Self> {
        Ok(Self {
            storage: local_storage()?,
        })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> BridgeResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|err| js_error("get_item", err))
    }

    fn set_item(&self, key: &str, value: &str) -> BridgeResult<()> {
        // Throws QuotaExceededError when the origin's quota is full.
        self.storage
            .set_item(key, value)
            .map_err(|err| js_error("set_item", err))
    }

    fn remove_item(&self, key: &str) -> BridgeResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|err| js_error("remove_item", err))
    }

    fn keys(&self) -> BridgeResult<Vec<String>> {
        let length = self
            .storage
            .length()
            .map_err(|err| js_error("length", err))?;

        let mut keys = Vec::with_capacity(length as usize);
        for index in 0..length {
            if let Some(key) = self
                .storage
                .key(index)
                .map_err(|err| js_error("key", err))?
            {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    fn clear(&self, prefix: &str) -> BridgeResult<()> {
        if prefix.is_empty() {
            return self.storage.clear().map_err(|err| js_error("clear", err));
        }

        for key in self.keys()? {
            if key.starts_with(prefix) {
                self.remove_item(&key)?;
            }
        }
        Ok(())
    }
}
