//! Startup flags handed to the application when it boots.
//!
//! Each configured key is read once from durable storage and parsed as JSON;
//! the API endpoint is always the configured constant.
//!
//! ```json
//! { "credentials": { "token": "..." }, "classrooms": null, "api": "http://localhost:8000/api/v1" }
//! ```

use std::sync::Arc;

use bridge_traits::KeyValueStore;
use core_runtime::config::ShellConfig;
use core_runtime::logging::redact_if_sensitive;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::Result;

static NULL: Value = Value::Null;

/// Flags snapshot. Serializes flat: one field per storage key plus `api`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flags {
    #[serde(flatten)]
    pub values: Map<String, Value>,
    pub api: String,
}

impl Flags {
    /// Value loaded for `key`; `null` when absent.
    pub fn get(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn credentials(&self) -> &Value {
        self.get("credentials")
    }

    pub fn classrooms(&self) -> &Value {
        self.get("classrooms")
    }
}

/// Reads [`Flags`] out of durable storage.
#[derive(Clone)]
pub struct FlagsLoader {
    store: Arc<dyn KeyValueStore>,
    keys: Vec<String>,
    api: String,
}

impl FlagsLoader {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &ShellConfig) -> Self {
        Self {
            store,
            keys: config.flag_keys.clone(),
            api: config.api_endpoint.clone(),
        }
    }

    /// Load the flags.
    ///
    /// Missing or empty values become `null`. A stored value that is not
    /// valid JSON is also treated as absent.
    ///
    /// # Errors
    ///
    /// Fails only when the store itself cannot be read.
    pub fn load(&self) -> Result<Flags> {
        let mut values = Map::new();

        for key in &self.keys {
            let value = match self.store.get_item(key)? {
                Some(raw) if !raw.is_empty() => serde_json::from_str(&raw).unwrap_or_else(|err| {
                    warn!(key = %key, error = %err, "Ignoring unparsable stored flag");
                    Value::Null
                }),
                _ => Value::Null,
            };

            debug!(
                key = %key,
                value = %redact_if_sensitive(key, &value.to_string()),
                "Loaded startup flag"
            );
            values.insert(key.clone(), value);
        }

        Ok(Flags {
            values,
            api: self.api.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::MemoryKeyValueStore;
    use serde_json::json;

    fn loader(items: &[(&str, &str)]) -> FlagsLoader {
        let store = MemoryKeyValueStore::with_items(items.iter().copied());
        FlagsLoader::new(Arc::new(store), &ShellConfig::default())
    }

    #[test]
    fn empty_storage_gives_null_flags() {
        let flags = loader(&[]).load().unwrap();

        assert_eq!(flags.credentials(), &Value::Null);
        assert_eq!(flags.classrooms(), &Value::Null);
        assert_eq!(flags.api, "http://localhost:8000/api/v1");
    }

    #[test]
    fn stored_values_are_parsed() {
        let flags = loader(&[
            ("credentials", r#"{"token":"abc","user":7}"#),
            ("classrooms", "[1,2,3]"),
        ])
        .load()
        .unwrap();

        assert_eq!(flags.credentials(), &json!({"token": "abc", "user": 7}));
        assert_eq!(flags.classrooms(), &json!([1, 2, 3]));
    }

    #[test]
    fn unparsable_value_is_treated_as_absent() {
        let flags = loader(&[("credentials", "{oops"), ("classrooms", "")])
            .load()
            .unwrap();

        assert_eq!(flags.credentials(), &Value::Null);
        assert_eq!(flags.classrooms(), &Value::Null);
    }

    #[test]
    fn serializes_flat() {
        let flags = loader(&[("classrooms", "[]")]).load().unwrap();

        assert_eq!(
            serde_json::to_value(&flags).unwrap(),
            json!({
                "credentials": null,
                "classrooms": [],
                "api": "http://localhost:8000/api/v1"
            })
        );
    }

    #[test]
    fn api_is_not_read_from_storage() {
        let flags = loader(&[("api", "\"http://evil.example\"")]).load().unwrap();
        assert_eq!(flags.api, "http://localhost:8000/api/v1");
        assert_eq!(flags.get("api"), &Value::Null);
    }
}
