//! Durable key-value bridge.
//!
//! Values are stored as their JSON text, so anything the application sends
//! can be read back as the same structured value. Writes overwrite; there is
//! no versioning or conflict handling between tabs.

use std::sync::Arc;

use bridge_traits::KeyValueStore;
use core_runtime::events::{EventBus, ShellEvent, StorageEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ServiceError};
use crate::ports::STORE_PORT;

/// Command sent by the application on its store port.
///
/// A missing `value` is stored as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreCommand {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

impl StoreCommand {
    pub fn parse(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| ServiceError::invalid_command(STORE_PORT, err))
    }
}

#[derive(Clone)]
pub struct DurableBridge {
    store: Arc<dyn KeyValueStore>,
    events: Option<EventBus>,
}

impl DurableBridge {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            events: None,
        }
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Read and parse the value under `key`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Serialization`] when the stored text is not JSON.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.store.get_item(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Store `value` under `key`, replacing what was there.
    pub fn set(&self, key: &str, value: &Value) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.store.set_item(key, &text)?;
        debug!(key, bytes = text.len(), "Stored value");
        self.emit_written(key);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.store.remove_item(key)?;
        Ok(())
    }

    /// Raw text under `key`, without parsing.
    pub fn get_text(&self, key: &str) -> Result<Option<String>> {
        Ok(self.store.get_item(key)?)
    }

    /// Store `text` under `key` as-is.
    pub fn set_text(&self, key: &str, text: &str) -> Result<()> {
        self.store.set_item(key, text)?;
        debug!(key, bytes = text.len(), "Stored text");
        self.emit_written(key);
        Ok(())
    }

    /// Keys starting with `prefix`; every key when `prefix` is empty.
    pub fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = self.store.keys()?;
        keys.retain(|key| key.starts_with(prefix));
        Ok(keys)
    }

    /// Remove every key starting with `prefix`.
    pub fn clear(&self, prefix: &str) -> Result<()> {
        self.store.clear(prefix)?;
        debug!(prefix, "Cleared stored keys");
        Ok(())
    }

    fn emit_written(&self, key: &str) {
        if let Some(events) = &self.events {
            let _ = events.emit(ShellEvent::Storage(StorageEvent::Written {
                key: key.to_string(),
            }));
        }
    }

    pub fn handle_store_command(&self, command: StoreCommand) -> Result<()> {
        self.set(&command.key, &command.value)
    }
}
