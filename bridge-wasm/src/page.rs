//! Page controller backed by `window.location`.

use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    offline::PageController,
};

use crate::error::WasmError;

/// Reloads the current document.
#[derive(Debug, Clone, Default)]
pub struct BrowserPage;

impl BrowserPage {
    /// Create a controller for the current page.
    pub fn new() -> Self {
        Self
    }
}

impl PageController for BrowserPage {
    fn reload(&self) -> BridgeResult<()> {
        let window = web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".into()))?;
        window
            .location()
            .reload()
            .map_err(|err| WasmError::from(err).into())
    }
}
