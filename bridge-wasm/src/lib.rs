//! WebAssembly Bridge Implementations
//!
//! Browser implementations of the bridge traits defined in `bridge-traits`,
//! built on `web-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It compiles to nothing on native targets.
//!
//! # Implementations
//!
//! - [`LocalStorageStore`]: `window.localStorage` as a durable key-value store
//! - [`ConsoleLoggerSink`]: browser console logger sink
//! - [`ServiceWorkerHost`]: `navigator.serviceWorker` registration and messages
//! - [`BrowserPage`]: `location.reload()`
//! - [`AppPort`]: named application ports (`subscribe` / `send`)
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::build_browser_bridges;
//!
//! let bridges = build_browser_bridges()?;
//! bridges.store.set_item("classrooms", "[]")?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod console;
pub mod error;
pub mod page;
pub mod ports;
pub mod service_worker;
pub mod storage;

// Re-export commonly used types
pub use bootstrap::{build_browser_bridges, BrowserBridgeSet};
pub use console::ConsoleLoggerSink;
pub use error::{WasmError, WasmResult};
pub use page::BrowserPage;
pub use ports::{app_ports, AppPort};
pub use service_worker::ServiceWorkerHost;
pub use storage::LocalStorageStore;
