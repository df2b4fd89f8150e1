//! Application port handlers.
//!
//! | port                 | direction      | handler                     |
//! |----------------------|----------------|-----------------------------|
//! | `sendToLocalStorage` | app → shell    | [`PortHandlers::store`]     |
//! | `sendToLogger`       | app → shell    | [`PortHandlers::log`]       |
//! | `sendToLayout`       | app → shell    | [`PortHandlers::layout`]    |
//! | `layoutMessages`     | shell → app    | [`AppPorts::layout_messages`] |

use std::sync::Arc;

use bridge_traits::{LogEntry, LogLevel, LoggerSink, RelayChannel};
use core_runtime::events::{EventBus, ShellEvent, StorageEvent};
use serde_json::Value;
use tracing::{trace, warn};

use crate::error::Result;
use crate::logger::LogCommand;
use crate::relay::LayoutRelay;
use crate::storage::{DurableBridge, StoreCommand};

pub const STORE_PORT: &str = "sendToLocalStorage";
pub const LOG_PORT: &str = "sendToLogger";
pub const LAYOUT_OUT_PORT: &str = "sendToLayout";
pub const LAYOUT_IN_PORT: &str = "layoutMessages";

const SHELL_LOG_TARGET: &str = "shell";

/// Incoming ports of the application, as provided by the host.
#[derive(Clone)]
pub struct AppPorts {
    pub layout_messages: Arc<dyn RelayChannel>,
}

/// Handlers for the application's outgoing ports. Cheap to clone; the host
/// subscribes one clone per port.
#[derive(Clone)]
pub struct PortHandlers {
    storage: DurableBridge,
    logger: Arc<dyn LoggerSink>,
    layout: LayoutRelay,
    events: EventBus,
}

impl PortHandlers {
    pub(crate) fn new(
        storage: DurableBridge,
        logger: Arc<dyn LoggerSink>,
        layout: LayoutRelay,
        events: EventBus,
    ) -> Self {
        Self {
            storage,
            logger,
            layout,
            events,
        }
    }

    /// Handle one `sendToLocalStorage` value.
    ///
    /// Failures are reported to the logger sink at `Error` level and
    /// returned; the port stays subscribed.
    pub async fn store(&self, value: Value) -> Result<()> {
        let outcome = self.try_store(value);

        if let Err(err) = &outcome {
            warn!(error = %err, "Store command failed");
            self.report(LogEntry::new(
                LogLevel::Error,
                SHELL_LOG_TARGET,
                format!("Failed to store value: {err}"),
            ))
            .await;
        }
        outcome
    }

    fn try_store(&self, value: Value) -> Result<()> {
        let command = StoreCommand::parse(value)?;
        let key = command.key.clone();

        self.storage.handle_store_command(command).map_err(|err| {
            let _ = self.events.emit(ShellEvent::Storage(StorageEvent::WriteFailed {
                key,
                message: err.to_string(),
            }));
            err
        })
    }

    /// Handle one `sendToLogger` value.
    pub async fn log(&self, value: Value) -> Result<()> {
        let command = LogCommand::parse(value)?;
        self.logger.log(command.into_entry()).await?;
        Ok(())
    }

    /// Handle one `sendToLayout` value.
    pub fn layout(&self, value: Value) -> Result<()> {
        self.layout.forward(value)
    }

    async fn report(&self, entry: LogEntry) {
        if let Err(err) = self.logger.log(entry).await {
            trace!(error = %err, "Logger sink rejected entry");
        }
    }
}
