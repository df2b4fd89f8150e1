//! Shell service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (durable storage,
//! logger sink, background agent host, page controller) into the shell's
//! core: the startup flags, the durable key-value bridge, the application's
//! port handlers and the offline-cache coordinator. Native hosts typically
//! enable the `desktop-shims` feature (which depends on `bridge-desktop` and
//! fills in any adapter not supplied), whereas WebAssembly builds enable the
//! `wasm` feature and rely on the adapters from `bridge-wasm`.

pub mod error;
pub mod flags;
pub mod logger;
pub mod ports;
pub mod relay;
pub mod storage;
pub mod tasks;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

pub use error::{Result, ServiceError};
pub use flags::{Flags, FlagsLoader};
pub use logger::LogCommand;
pub use ports::{AppPorts, PortHandlers};
pub use relay::LayoutRelay;
pub use storage::{DurableBridge, StoreCommand};
pub use tasks::StorageTasks;

use std::sync::Arc;

use bridge_traits::{BackgroundAgentHost, KeyValueStore, LoggerSink, PageController};
use core_offline::OfflineCacheCoordinator;
use core_runtime::config::ShellConfig;
use core_runtime::events::EventBus;
use tracing::info;

/// Primary façade exposed to host applications.
pub struct ShellService {
    config: ShellConfig,
    logger: Arc<dyn LoggerSink>,
    events: EventBus,
    flags: FlagsLoader,
    storage: DurableBridge,
    coordinator: Arc<OfflineCacheCoordinator>,
}

impl ShellService {
    pub fn builder() -> ShellServiceBuilder {
        ShellServiceBuilder::default()
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Read the startup flags from durable storage.
    pub fn flags(&self) -> Result<Flags> {
        self.flags.load()
    }

    pub fn storage(&self) -> &DurableBridge {
        &self.storage
    }

    /// Request/response storage tasks over the same store.
    pub fn storage_tasks(&self) -> StorageTasks {
        StorageTasks::new(self.storage.clone())
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn coordinator(&self) -> &Arc<OfflineCacheCoordinator> {
        &self.coordinator
    }

    /// Called once the application is running. Returns the handlers the
    /// host subscribes to the application's outgoing ports.
    pub fn on_ready(&self, ports: AppPorts) -> PortHandlers {
        info!(layout_port = ports.layout_messages.name(), "Application ready");
        PortHandlers::new(
            self.storage.clone(),
            Arc::clone(&self.logger),
            LayoutRelay::new(ports.layout_messages),
            self.events.clone(),
        )
    }

    /// Register the offline caching agent in the background.
    pub fn start_offline_cache(&self) -> Result<()> {
        self.coordinator.start()?;
        Ok(())
    }
}

/// Builder for [`ShellService`].
///
/// With the `desktop-shims` feature on native targets, adapters that are not
/// supplied default to the `bridge-desktop` ones: an in-memory store, a
/// `tracing` logger sink and a host without service worker support.
/// Otherwise every adapter is required.
#[derive(Default)]
pub struct ShellServiceBuilder {
    config: Option<ShellConfig>,
    store: Option<Arc<dyn KeyValueStore>>,
    logger: Option<Arc<dyn LoggerSink>>,
    agent_host: Option<Arc<dyn BackgroundAgentHost>>,
    page: Option<Arc<dyn PageController>>,
    events: Option<EventBus>,
}

impl ShellServiceBuilder {
    pub fn config(mut self, config: ShellConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn LoggerSink>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn agent_host(mut self, host: Arc<dyn BackgroundAgentHost>) -> Self {
        self.agent_host = Some(host);
        self
    }

    pub fn page(mut self, page: Arc<dyn PageController>) -> Self {
        self.page = Some(page);
        self
    }

    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    #[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
    fn fill_desktop_defaults(mut self) -> Self {
        self.store.get_or_insert_with(|| {
            Arc::new(bridge_desktop::MemoryKeyValueStore::new()) as Arc<dyn KeyValueStore>
        });
        self.logger.get_or_insert_with(|| {
            Arc::new(bridge_desktop::TracingLoggerSink::new()) as Arc<dyn LoggerSink>
        });
        self.agent_host.get_or_insert_with(|| {
            Arc::new(bridge_desktop::HeadlessAgentHost::new()) as Arc<dyn BackgroundAgentHost>
        });
        self.page.get_or_insert_with(|| {
            Arc::new(bridge_desktop::HeadlessPage::new()) as Arc<dyn PageController>
        });
        self
    }

    pub fn build(self) -> Result<ShellService> {
        #[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
        let builder = self.fill_desktop_defaults();
        #[cfg(not(all(feature = "desktop-shims", not(target_arch = "wasm32"))))]
        let builder = self;

        let config = builder.config.unwrap_or_default();
        config.validate()?;

        let store = builder
            .store
            .ok_or_else(|| missing("KeyValueStore", "a durable key-value store is required"))?;
        let logger = builder
            .logger
            .ok_or_else(|| missing("LoggerSink", "a logger sink is required"))?;
        let agent_host = builder.agent_host.ok_or_else(|| {
            missing("BackgroundAgentHost", "a background agent host is required")
        })?;
        let page = builder
            .page
            .ok_or_else(|| missing("PageController", "a page controller is required"))?;
        let events = builder.events.unwrap_or_default();

        let coordinator = OfflineCacheCoordinator::builder()
            .host(agent_host)
            .page(page)
            .logger(Arc::clone(&logger))
            .config(config.offline.clone())
            .event_bus(events.clone())
            .build()?;

        Ok(ShellService {
            flags: FlagsLoader::new(Arc::clone(&store), &config),
            storage: DurableBridge::new(store).with_event_bus(events.clone()),
            config,
            logger,
            events,
            coordinator,
        })
    }
}

fn missing(capability: &str, message: &str) -> ServiceError {
    ServiceError::Runtime(core_runtime::Error::capability_missing(capability, message))
}
