//! # Event Bus System
//!
//! Broadcasts shell-level events through `tokio::sync::broadcast` so that
//! anything interested in offline-cache status or storage writes can observe
//! them without being wired into the component that produces them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   emit    ┌───────────┐
//! │ Offline Coordin. ├──────────>│           │   subscribe   ┌────────────┐
//! └──────────────────┘           │ EventBus  ├──────────────>│ Subscriber │
//! ┌──────────────────┐   emit    │ (broadcast│               └────────────┘
//! │ Durable Bridge   ├──────────>│  channel) │
//! └──────────────────┘           └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CacheEvent, EventBus, ShellEvent};
//!
//! let event_bus = EventBus::new(16);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus.emit(ShellEvent::Cache(CacheEvent::ReloadRequested)).ok();
//! assert_eq!(
//!     subscriber.try_recv().unwrap(),
//!     ShellEvent::Cache(CacheEvent::ReloadRequested)
//! );
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events. Non-fatal.
//! - **`RecvError::Closed`**: every sender was dropped. Treat as shutdown.
//!
//! Emitting with no subscribers returns `Err` from [`EventBus::emit`]; the
//! shell's producers ignore that case.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 32;

// ============================================================================
// Shell Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum ShellEvent {
    /// Offline-cache coordinator events
    Cache(CacheEvent),
    /// Durable storage events
    Storage(StorageEvent),
}

/// Events produced by the offline-cache coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CacheEvent {
    /// The coordinator moved to a new state.
    StateChanged {
        /// Label of the new state (e.g. `registered(waiting)`).
        state: String,
    },
    /// The caching agent asked for a full page reload.
    ReloadRequested,
}

/// Events produced by the durable key-value bridge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum StorageEvent {
    /// A value was written under `key`.
    Written { key: String },
    /// Writing under `key` failed.
    WriteFailed { key: String, message: String },
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for shell events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShellEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// Subscribers falling behind by more than `capacity` events receive
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: ShellEvent) -> Result<usize, SendError<ShellEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
