//! Task-style storage access for the application.
//!
//! Besides the fire-and-forget `sendToLocalStorage` port, the application
//! can read and manage storage through request/response tasks. Values are
//! opaque strings here: the application encodes and decodes them itself.
//!
//! | task            | argument               | result              |
//! |-----------------|------------------------|---------------------|
//! | `localGet`      | key                    | string or `null`    |
//! | `localPut`      | `{ key, value }`       | `null`              |
//! | `localRemove`   | key                    | `null`              |
//! | `localListKeys` | prefix                 | array of keys       |
//! | `localClear`    | prefix                 | `null`              |

use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::error::{Result, ServiceError};
use crate::storage::DurableBridge;

/// Namespace the storage tasks are registered under.
pub const TASK_NAMESPACE: &str = "lobanov/elm-localstorage";

pub const LOCAL_GET: &str = "localGet";
pub const LOCAL_PUT: &str = "localPut";
pub const LOCAL_REMOVE: &str = "localRemove";
pub const LOCAL_LIST_KEYS: &str = "localListKeys";
pub const LOCAL_CLEAR: &str = "localClear";

/// Every task name, in registration order.
pub const TASK_NAMES: [&str; 5] = [LOCAL_GET, LOCAL_PUT, LOCAL_REMOVE, LOCAL_LIST_KEYS, LOCAL_CLEAR];

#[derive(Debug, Deserialize)]
struct PutArgs {
    key: String,
    value: String,
}

/// Handlers behind the storage tasks.
#[derive(Clone)]
pub struct StorageTasks {
    storage: DurableBridge,
}

impl StorageTasks {
    pub fn new(storage: DurableBridge) -> Self {
        Self { storage }
    }

    /// Run the task `name` with its JSON argument and return its JSON result.
    ///
    /// # Errors
    ///
    /// [`ServiceError::UnknownTask`] for names outside [`TASK_NAMES`],
    /// [`ServiceError::InvalidCommand`] when the argument has the wrong
    /// shape, and any storage error.
    pub fn call(&self, name: &str, args: Value) -> Result<Value> {
        trace!(task = name, "Storage task");

        match name {
            LOCAL_GET => {
                let key = string_arg(LOCAL_GET, args)?;
                Ok(self.storage.get_text(&key)?.map_or(Value::Null, Value::String))
            }
            LOCAL_PUT => {
                let PutArgs { key, value } = serde_json::from_value(args)
                    .map_err(|err| ServiceError::invalid_command(LOCAL_PUT, err))?;
                self.storage.set_text(&key, &value)?;
                Ok(Value::Null)
            }
            LOCAL_REMOVE => {
                let key = string_arg(LOCAL_REMOVE, args)?;
                self.storage.remove(&key)?;
                Ok(Value::Null)
            }
            LOCAL_LIST_KEYS => {
                let prefix = string_arg(LOCAL_LIST_KEYS, args)?;
                let keys = self.storage.list_keys(&prefix)?;
                Ok(Value::Array(keys.into_iter().map(Value::String).collect()))
            }
            LOCAL_CLEAR => {
                let prefix = string_arg(LOCAL_CLEAR, args)?;
                self.storage.clear(&prefix)?;
                Ok(Value::Null)
            }
            other => Err(ServiceError::UnknownTask(other.to_string())),
        }
    }
}

fn string_arg(task: &'static str, args: Value) -> Result<String> {
    match args {
        Value::String(text) => Ok(text),
        other => Err(ServiceError::invalid_command(
            task,
            format!("expected a string argument, got {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_desktop::MemoryKeyValueStore;
    use serde_json::json;
    use std::sync::Arc;

    fn tasks(items: &[(&str, &str)]) -> StorageTasks {
        let store = MemoryKeyValueStore::with_items(items.iter().copied());
        StorageTasks::new(DurableBridge::new(Arc::new(store)))
    }

    #[test]
    fn get_returns_raw_text_or_null() {
        let tasks = tasks(&[("theme", "dark")]);

        assert_eq!(tasks.call(LOCAL_GET, json!("theme")).unwrap(), json!("dark"));
        assert_eq!(tasks.call(LOCAL_GET, json!("missing")).unwrap(), Value::Null);
    }

    #[test]
    fn put_stores_text_verbatim() {
        let tasks = tasks(&[]);

        tasks
            .call(LOCAL_PUT, json!({"key": "draft.essay", "value": "not json"}))
            .unwrap();

        assert_eq!(
            tasks.call(LOCAL_GET, json!("draft.essay")).unwrap(),
            json!("not json")
        );
    }

    #[test]
    fn remove_list_and_clear() {
        let tasks = tasks(&[("draft.a", "1"), ("draft.b", "2"), ("credentials", "null")]);

        tasks.call(LOCAL_REMOVE, json!("draft.a")).unwrap();
        assert_eq!(
            tasks.call(LOCAL_LIST_KEYS, json!("draft.")).unwrap(),
            json!(["draft.b"])
        );

        tasks.call(LOCAL_CLEAR, json!("")).unwrap();
        assert_eq!(tasks.call(LOCAL_LIST_KEYS, json!("")).unwrap(), json!([]));
    }

    #[test]
    fn rejects_bad_arguments_and_unknown_tasks() {
        let tasks = tasks(&[]);

        let err = tasks.call(LOCAL_GET, json!(7)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCommand { port: LOCAL_GET, .. }));

        let err = tasks.call(LOCAL_PUT, json!({"key": "k"})).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCommand { port: LOCAL_PUT, .. }));

        let err = tasks.call("sessionGet", json!("k")).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownTask(name) if name == "sessionGet"));
    }
}
