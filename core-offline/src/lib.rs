//! # Offline Cache
//!
//! Coordinates the page's background caching agent (a service worker in the
//! browser): registration at page load, lifecycle logging, and the control
//! messages the agent posts back to the page.
//!
//! The coordinator talks to the host only through the `bridge-traits`
//! capabilities it is given ([`BackgroundAgentHost`], [`PageController`],
//! [`LoggerSink`]), so the same logic runs in the browser and under test
//! doubles on native targets.
//!
//! [`BackgroundAgentHost`]: bridge_traits::BackgroundAgentHost
//! [`PageController`]: bridge_traits::PageController
//! [`LoggerSink`]: bridge_traits::LoggerSink

pub mod coordinator;
pub mod error;
pub mod message;
mod runtime;
pub mod state;

pub use coordinator::{
    lifecycle_message, MessageDisposition, OfflineCacheCoordinator, OfflineCacheCoordinatorBuilder,
};
pub use error::{OfflineError, Result};
pub use message::{ControlMessage, UncachableResponse};
pub use state::CoordinatorState;
