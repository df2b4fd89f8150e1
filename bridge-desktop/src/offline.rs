//! Background agent and page adapters for hosts without a browser

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    offline::{BackgroundAgentHost, PageController, RegistrationRequest, RegistrationSnapshot},
    platform::ControlMessageListener,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Native processes have no service worker support, so this host always
/// reports the capability as absent. The coordinator then settles in its
/// `unsupported` state without attempting a registration.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessAgentHost;

impl HeadlessAgentHost {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BackgroundAgentHost for HeadlessAgentHost {
    fn supports_background_agent(&self) -> bool {
        false
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationSnapshot> {
        debug!(script = %request.script_location, "Registration requested on headless host");
        Err(BridgeError::NotAvailable("background agent".to_string()))
    }

    fn install_message_listener(&self, _listener: ControlMessageListener) -> Result<()> {
        Err(BridgeError::NotAvailable("background agent".to_string()))
    }
}

/// Page controller for headless hosts. There is no document to reload, so
/// reload requests are counted and logged.
#[derive(Debug, Default)]
pub struct HeadlessPage {
    reloads: AtomicUsize,
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reloads requested so far.
    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl PageController for HeadlessPage {
    fn reload(&self) -> Result<()> {
        let count = self.reloads.fetch_add(1, Ordering::SeqCst) + 1;
        info!(count, "Page reload requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn headless_host_is_unsupported() {
        let host = HeadlessAgentHost::new();
        assert!(!host.supports_background_agent());

        let result = host
            .register(&RegistrationRequest::new("/static/sw.js", "/"))
            .await;
        assert!(matches!(result, Err(BridgeError::NotAvailable(_))));
        assert!(host.install_message_listener(Box::new(|_| {})).is_err());
    }

    #[test]
    fn headless_page_counts_reloads() {
        let page = HeadlessPage::new();
        page.reload().unwrap();
        page.reload().unwrap();
        assert_eq!(page.reload_count(), 2);
    }
}
