//! Convenience helpers for wiring all browser bridge implementations together.
//!
//! Host shells call [`build_browser_bridges`] once at startup instead of
//! constructing each adapter by hand. The result mirrors what the
//! `bridge-desktop` crate provides for native targets.

use std::sync::Arc;

use bridge_traits::{
    error::Result as BridgeResult,
    logging::LoggerSink,
    offline::{BackgroundAgentHost, PageController},
    storage::KeyValueStore,
};

use crate::{ConsoleLoggerSink, BrowserPage, LocalStorageStore, ServiceWorkerHost};

/// Fully constructed browser bridge objects ready for injection into the core.
pub struct BrowserBridgeSet {
    /// `window.localStorage`.
    pub store: Arc<dyn KeyValueStore>,
    /// Browser console.
    pub logger: Arc<dyn LoggerSink>,
    /// `navigator.serviceWorker`.
    pub agent_host: Arc<dyn BackgroundAgentHost>,
    /// `window.location`.
    pub page: Arc<dyn PageController>,
}

/// Build the default browser bridge stack.
///
/// Also installs the panic hook so Rust panics show up in the console.
/// Fails only when `localStorage` is unavailable (for example when storage
/// is disabled for the origin).
pub fn build_browser_bridges() -> BridgeResult<BrowserBridgeSet> {
    console_error_panic_hook::set_once();

    Ok(BrowserBridgeSet {
        store: Arc::new(LocalStorageStore::new()?),
        logger: Arc::new(ConsoleLoggerSink::new()),
        agent_host: Arc::new(ServiceWorkerHost::new()),
        page: Arc::new(BrowserPage::new()),
    })
}
