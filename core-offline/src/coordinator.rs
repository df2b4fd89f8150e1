//! # Offline-Cache Coordinator
//!
//! Registers the background caching agent at page load and reacts to the
//! control messages it posts back.
//!
//! ## Workflow
//!
//! 1. Check that the host supports a background caching agent. If it does
//!    not, stop quietly in [`CoordinatorState::Unsupported`].
//! 2. Issue a single registration request (`/static/sw.js`, scope `/` by
//!    default) and wait for the host to settle it.
//! 3. On success, install the control-message listener, then write one log
//!    entry for the first populated lifecycle slot (installing, then waiting,
//!    then active).
//! 4. On failure, write one error entry `Registration failed with <error>`.
//!
//! Every control message is handled independently:
//!
//! | `type`                 | effect                         |
//! |------------------------|--------------------------------|
//! | `refresh`              | reload the page once           |
//! | `uncachable-response`  | none (reserved)                |
//! | anything else          | ignored                        |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_offline::OfflineCacheCoordinator;
//! use std::sync::Arc;
//!
//! let coordinator = OfflineCacheCoordinator::builder()
//!     .host(host)
//!     .page(page)
//!     .logger(logger)
//!     .build()?;
//!
//! coordinator.start()?;
//! ```

use std::sync::{Arc, Weak};

use bridge_traits::{
    BackgroundAgentHost, LifecycleSlot, LogEntry, LogLevel, LoggerSink, PageController,
    RegistrationRequest, RegistrationSnapshot,
};
use core_runtime::config::{OfflineConfig, RegistrationTimeout};
use core_runtime::events::{CacheEvent, EventBus, ShellEvent};
use futures::future::{self, Either};
use tokio::sync::watch;
use tracing::{debug, instrument, trace, warn};

use crate::error::{OfflineError, Result};
use crate::message::ControlMessage;
use crate::runtime;
use crate::state::CoordinatorState;

const LOG_TARGET: &str = "offline-cache";

/// What the coordinator did with a control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDisposition {
    /// A page reload was requested.
    Reloaded,
    /// Recognized and deliberately left without effect.
    Acknowledged,
    /// Unknown or malformed.
    Ignored,
}

/// Offline-cache coordinator.
///
/// Shared behind an `Arc`; the control-message listener holds only a weak
/// reference so dropping the coordinator silences it.
pub struct OfflineCacheCoordinator {
    host: Arc<dyn BackgroundAgentHost>,
    page: Arc<dyn PageController>,
    logger: Arc<dyn LoggerSink>,
    config: OfflineConfig,
    events: Option<EventBus>,
    state: watch::Sender<CoordinatorState>,
}

impl OfflineCacheCoordinator {
    pub fn builder() -> OfflineCacheCoordinatorBuilder {
        OfflineCacheCoordinatorBuilder::default()
    }

    /// Current state.
    pub fn state(&self) -> CoordinatorState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorState> {
        self.state.subscribe()
    }

    /// Whether the caching agent was registered.
    pub fn is_caching_enabled(&self) -> bool {
        self.state.borrow().is_listening()
    }

    pub fn config(&self) -> &OfflineConfig {
        &self.config
    }

    /// Run [`initialize`](Self::initialize) as a detached task on the
    /// current executor. Page loading continues without waiting for it.
    ///
    /// # Errors
    ///
    /// [`OfflineError::NoRuntime`] on native targets when called outside a
    /// Tokio runtime.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let coordinator = Arc::clone(self);
        runtime::spawn_detached(async move {
            coordinator.initialize().await;
        })
    }

    /// Check capability and register the caching agent.
    ///
    /// Only the first call does anything; later calls return immediately.
    /// Registration outcomes are reported through the logger sink and the
    /// state channel, never returned.
    #[instrument(skip(self))]
    pub async fn initialize(self: &Arc<Self>) {
        let next = if self.host.supports_background_agent() {
            CoordinatorState::Registering
        } else {
            CoordinatorState::Unsupported
        };

        if !self.claim(next.clone()) {
            debug!("Offline cache already initialized");
            return;
        }

        if next == CoordinatorState::Unsupported {
            debug!("Background caching agent not supported by host");
            return;
        }

        let request =
            RegistrationRequest::new(&self.config.script_location, self.config.scope.clone());

        match self.register(&request).await {
            Ok(snapshot) => self.on_registered(snapshot).await,
            Err(err) => self.on_registration_failed(err).await,
        }
    }

    /// Handle the raw text of one control message.
    pub fn on_control_message(&self, raw: &str) -> MessageDisposition {
        let message = match ControlMessage::parse(raw) {
            Ok(message) => message,
            Err(err) => {
                trace!(error = %err, "Ignoring malformed control message");
                return MessageDisposition::Ignored;
            }
        };

        match message {
            ControlMessage::Refresh => {
                debug!("Caching agent requested a page reload");
                self.emit(CacheEvent::ReloadRequested);
                if let Err(err) = self.page.reload() {
                    warn!(error = %err, "Page reload failed");
                }
                MessageDisposition::Reloaded
            }
            // Reserved for surfacing failed fetches; no effect yet.
            ControlMessage::UncachableResponse(_) => MessageDisposition::Acknowledged,
            ControlMessage::Unrecognized(kind) => {
                trace!(kind = %kind, "Ignoring unrecognized control message");
                MessageDisposition::Ignored
            }
        }
    }

    /// Atomically move out of `uninitialized`.
    fn claim(&self, next: CoordinatorState) -> bool {
        let label = next.label();
        let claimed = self.state.send_if_modified(|state| {
            if *state == CoordinatorState::Uninitialized {
                *state = next;
                true
            } else {
                false
            }
        });

        if claimed {
            self.emit(CacheEvent::StateChanged { state: label });
        }
        claimed
    }

    fn transition(&self, next: CoordinatorState) {
        let label = next.label();
        self.state.send_replace(next);
        self.emit(CacheEvent::StateChanged { state: label });
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationSnapshot> {
        let registration = self.host.register(request);

        match self.config.registration_timeout {
            RegistrationTimeout::Unbounded => registration.await.map_err(OfflineError::Registration),
            RegistrationTimeout::Bounded(limit) => {
                let expiry = Box::pin(runtime::sleep(limit));
                match future::select(registration, expiry).await {
                    Either::Left((outcome, _)) => outcome.map_err(OfflineError::Registration),
                    Either::Right(_) => Err(OfflineError::TimedOut(limit)),
                }
            }
        }
    }

    async fn on_registered(self: &Arc<Self>, snapshot: RegistrationSnapshot) {
        if let Err(err) = self.attach_listener() {
            warn!(error = %err, "Could not install control-message listener");
        }

        let slot = snapshot.populated_slot();
        debug!(slot = ?slot, scope = %snapshot.scope, "Caching agent registered");
        self.transition(CoordinatorState::Registered {
            scope: snapshot.scope,
            slot,
        });

        if let Some(slot) = slot {
            self.report(LogLevel::Info, lifecycle_message(slot)).await;
        }
    }

    async fn on_registration_failed(&self, err: OfflineError) {
        debug!(error = %err, "Caching agent registration failed");
        self.transition(CoordinatorState::RegistrationFailed {
            reason: err.to_string(),
        });
        self.report(LogLevel::Error, format!("Registration failed with {err}"))
            .await;
    }

    fn attach_listener(self: &Arc<Self>) -> bridge_traits::error::Result<()> {
        let coordinator: Weak<Self> = Arc::downgrade(self);
        self.host.install_message_listener(Box::new(move |raw: String| {
            if let Some(coordinator) = coordinator.upgrade() {
                coordinator.on_control_message(&raw);
            }
        }))
    }

    async fn report(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, LOG_TARGET, message);
        if let Err(err) = self.logger.log(entry).await {
            trace!(error = %err, "Logger sink rejected entry");
        }
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(events) = &self.events {
            // No subscribers is fine.
            let _ = events.emit(ShellEvent::Cache(event));
        }
    }
}

/// Log line for the first populated lifecycle slot.
pub fn lifecycle_message(slot: LifecycleSlot) -> &'static str {
    match slot {
        LifecycleSlot::Installing => "Service worker installing",
        LifecycleSlot::Waiting => "Service worker installed",
        LifecycleSlot::Active => "Service worker active",
    }
}

/// Builder for [`OfflineCacheCoordinator`].
#[derive(Default)]
pub struct OfflineCacheCoordinatorBuilder {
    host: Option<Arc<dyn BackgroundAgentHost>>,
    page: Option<Arc<dyn PageController>>,
    logger: Option<Arc<dyn LoggerSink>>,
    config: Option<OfflineConfig>,
    events: Option<EventBus>,
}

impl OfflineCacheCoordinatorBuilder {
    pub fn host(mut self, host: Arc<dyn BackgroundAgentHost>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn page(mut self, page: Arc<dyn PageController>) -> Self {
        self.page = Some(page);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn LoggerSink>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Default: `/static/sw.js` at scope `/`, unbounded wait.
    pub fn config(mut self, config: OfflineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// # Errors
    ///
    /// [`core_runtime::Error::CapabilityMissing`] when a host adapter was not
    /// supplied, [`core_runtime::Error::Config`] when the configuration is
    /// invalid.
    pub fn build(self) -> core_runtime::Result<Arc<OfflineCacheCoordinator>> {
        let host = self.host.ok_or_else(|| {
            core_runtime::Error::capability_missing(
                "BackgroundAgentHost",
                "a background agent host is required",
            )
        })?;
        let page = self.page.ok_or_else(|| {
            core_runtime::Error::capability_missing("PageController", "a page controller is required")
        })?;
        let logger = self.logger.ok_or_else(|| {
            core_runtime::Error::capability_missing("LoggerSink", "a logger sink is required")
        })?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        let (state, _) = watch::channel(CoordinatorState::Uninitialized);

        Ok(Arc::new(OfflineCacheCoordinator {
            host,
            page,
            logger,
            config,
            events: self.events,
            state,
        }))
    }
}

impl std::fmt::Debug for OfflineCacheCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineCacheCoordinator")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_messages() {
        assert_eq!(
            lifecycle_message(LifecycleSlot::Installing),
            "Service worker installing"
        );
        assert_eq!(
            lifecycle_message(LifecycleSlot::Waiting),
            "Service worker installed"
        );
        assert_eq!(
            lifecycle_message(LifecycleSlot::Active),
            "Service worker active"
        );
    }
}
