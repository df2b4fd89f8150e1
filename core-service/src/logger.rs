//! Log commands sent by the application.

use bridge_traits::{LogEntry, LogLevel};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ServiceError};
use crate::ports::LOG_PORT;

/// Target recorded on entries that originate in the application.
pub const APP_LOG_TARGET: &str = "app";

/// `{ level, title, data }` as sent on the logger port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogCommand {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub data: Value,
}

impl LogCommand {
    pub fn parse(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| ServiceError::invalid_command(LOG_PORT, err))
    }

    /// Unrecognized labels log at `Info`.
    pub fn level(&self) -> LogLevel {
        LogLevel::from_label(&self.level).unwrap_or(LogLevel::Info)
    }

    /// The entry keeps the application's own label in the message
    /// (`"<level>: <title>"`) and the payload as JSON text in `data`.
    pub fn into_entry(self) -> LogEntry {
        let level = self.level();
        LogEntry::new(level, APP_LOG_TARGET, format!("{}: {}", self.level, self.title))
            .with_field("data", self.data.to_string())
    }
}
