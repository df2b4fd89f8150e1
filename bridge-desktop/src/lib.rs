//! # Desktop Bridge Implementations
//!
//! Native implementations of the shell's bridge traits, used by headless
//! hosts, command-line tooling and tests.
//!
//! ## Overview
//!
//! - `KeyValueStore` as an in-process map ([`MemoryKeyValueStore`])
//! - `LoggerSink` forwarding to `tracing` ([`TracingLoggerSink`])
//! - `BackgroundAgentHost` reporting the capability as absent
//!   ([`HeadlessAgentHost`]); there is no service worker outside a browser
//! - `PageController` that records reload requests ([`HeadlessPage`])
//! - `RelayChannel` backed by a Tokio channel ([`ChannelRelay`])
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::MemoryKeyValueStore;
//! use bridge_traits::KeyValueStore;
//!
//! let store = MemoryKeyValueStore::with_items([("classrooms", "[]")]);
//! store.set_item("credentials", "null")?;
//! ```

mod logger;
mod offline;
mod relay;
mod storage;

pub use logger::TracingLoggerSink;
pub use offline::{HeadlessAgentHost, HeadlessPage};
pub use relay::ChannelRelay;
pub use storage::MemoryKeyValueStore;
