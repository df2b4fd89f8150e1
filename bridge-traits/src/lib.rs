//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host must implement for the shell.
//!
//! ## Overview
//!
//! This crate defines the contract between the shell's core and the
//! environment it runs in. Each trait represents a capability the core needs
//! but that is provided differently per host (browser page, desktop harness,
//! test double).
//!
//! ## Traits
//!
//! ### Storage & Messaging
//! - [`KeyValueStore`](storage::KeyValueStore) - Durable string storage (`localStorage`)
//! - [`RelayChannel`](relay::RelayChannel) - One direction of an opaque value conduit
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to the host console
//!
//! ### Offline Caching
//! - [`BackgroundAgentHost`](offline::BackgroundAgentHost) - Install and listen to the caching agent
//! - [`PageController`](offline::PageController) - Page-level effects (full reload)
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Background agent |
//! |----------|----------------------|------------------|
//! | Web      | `bridge-wasm`        | Service Worker   |
//! | Desktop  | `bridge-desktop`     | Not supported    |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Host rejections
//! are carried as [`BridgeError::Rejected`] with the host's own message so the
//! core can report them verbatim.
//!
//! ## Thread Safety
//!
//! On native targets every trait requires `Send + Sync`. On `wasm32` the
//! bounds are dropped through [`PlatformSendSync`](platform::PlatformSendSync)
//! because browser handles are single-threaded.

pub mod error;
pub mod logging;
pub mod offline;
pub mod platform;
pub mod relay;
pub mod storage;

pub use error::BridgeError;

// Re-export commonly used types
pub use logging::{LogEntry, LogLevel, LoggerSink};
pub use offline::{
    AgentDescriptor, BackgroundAgentHost, LifecycleSlot, PageController, RegistrationRequest,
    RegistrationSnapshot,
};
pub use platform::{ControlMessageListener, PlatformSendSync};
pub use relay::RelayChannel;
pub use storage::KeyValueStore;
