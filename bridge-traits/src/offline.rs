//! Background Caching Agent Abstractions
//!
//! Contracts for the host-managed offline caching agent (a Service Worker on
//! the web) and for the page-level effects the shell performs in response to
//! it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    error::Result,
    platform::{ControlMessageListener, PlatformSendSync},
};

/// Install request for the background agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Location of the agent script (e.g. `/static/sw.js`)
    pub script_location: String,
    /// Path prefix the agent controls (e.g. `/`)
    pub scope: String,
}

impl RegistrationRequest {
    pub fn new(script_location: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            script_location: script_location.into(),
            scope: scope.into(),
        }
    }
}

/// Lifecycle slot of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleSlot {
    Installing,
    Waiting,
    Active,
}

impl fmt::Display for LifecycleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Installing => "installing",
            Self::Waiting => "waiting",
            Self::Active => "active",
        };
        f.write_str(label)
    }
}

/// An agent occupying one lifecycle slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Script the agent was started from
    pub script_url: String,
}

impl AgentDescriptor {
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
        }
    }
}

/// Snapshot of a successful registration, read once when the host confirms it.
///
/// This is not a live view: later lifecycle transitions of the agent are not
/// reflected here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSnapshot {
    pub scope: String,
    pub installing: Option<AgentDescriptor>,
    pub waiting: Option<AgentDescriptor>,
    pub active: Option<AgentDescriptor>,
}

impl RegistrationSnapshot {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    pub fn with_slot(mut self, slot: LifecycleSlot, agent: AgentDescriptor) -> Self {
        match slot {
            LifecycleSlot::Installing => self.installing = Some(agent),
            LifecycleSlot::Waiting => self.waiting = Some(agent),
            LifecycleSlot::Active => self.active = Some(agent),
        }
        self
    }

    /// The populated slot, checked in `installing`, `waiting`, `active`
    /// order. `None` when no slot is populated.
    pub fn populated_slot(&self) -> Option<LifecycleSlot> {
        if self.installing.is_some() {
            Some(LifecycleSlot::Installing)
        } else if self.waiting.is_some() {
            Some(LifecycleSlot::Waiting)
        } else if self.active.is_some() {
            Some(LifecycleSlot::Active)
        } else {
            None
        }
    }
}

/// Host capability for installing and talking to the background agent.
///
/// # Platform Notes
///
/// - **Web**: `navigator.serviceWorker`
/// - **Desktop**: no equivalent, `supports_background_agent` returns `false`
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait BackgroundAgentHost: PlatformSendSync {
    /// Whether the host exposes background-agent support at all.
    fn supports_background_agent(&self) -> bool;

    /// Install the agent described by `request`.
    ///
    /// Suspends until the host confirms or rejects. Hosts never resolving is
    /// possible; callers own any timeout policy.
    async fn register(&self, request: &RegistrationRequest) -> Result<RegistrationSnapshot>;

    /// Route every message the agent posts to the page into `listener`.
    ///
    /// Installing a listener replaces any previously installed one.
    fn install_message_listener(&self, listener: ControlMessageListener) -> Result<()>;
}

/// Page-level navigation effects.
pub trait PageController: PlatformSendSync {
    /// Perform a full navigational reload of the current page.
    fn reload(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populated_slot_prefers_installing() {
        let snapshot = RegistrationSnapshot::new("/")
            .with_slot(LifecycleSlot::Active, AgentDescriptor::new("/static/sw.js"))
            .with_slot(LifecycleSlot::Installing, AgentDescriptor::new("/static/sw.js"));

        assert_eq!(snapshot.populated_slot(), Some(LifecycleSlot::Installing));
    }

    #[test]
    fn populated_slot_falls_through_to_active() {
        let snapshot = RegistrationSnapshot::new("/")
            .with_slot(LifecycleSlot::Active, AgentDescriptor::new("/static/sw.js"));
        assert_eq!(snapshot.populated_slot(), Some(LifecycleSlot::Active));

        let snapshot = RegistrationSnapshot::new("/")
            .with_slot(LifecycleSlot::Waiting, AgentDescriptor::new("/static/sw.js"))
            .with_slot(LifecycleSlot::Active, AgentDescriptor::new("/static/sw.js"));
        assert_eq!(snapshot.populated_slot(), Some(LifecycleSlot::Waiting));
    }

    #[test]
    fn empty_snapshot_has_no_slot() {
        assert_eq!(RegistrationSnapshot::new("/").populated_slot(), None);
    }

    #[test]
    fn slot_serializes_lowercase() {
        let json = serde_json::to_string(&LifecycleSlot::Waiting).unwrap();
        assert_eq!(json, "\"waiting\"");
        assert_eq!(LifecycleSlot::Installing.to_string(), "installing");
    }
}
