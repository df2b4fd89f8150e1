//! Relay Channel Abstraction
//!
//! A relay channel is a named, one-directional conduit carrying one opaque
//! structured value per send, with no acknowledgment. The shell never looks
//! inside the values; it only moves them.

use serde_json::Value;

use crate::{error::Result, platform::PlatformSendSync};

/// One direction of an application ↔ surface conduit.
///
/// `send` takes the value by ownership: the sender keeps no reference after
/// handoff and the receiver gets its own independent copy.
///
/// Implementations must deliver values in the order they were sent.
pub trait RelayChannel: PlatformSendSync {
    /// Channel name as known to the application (e.g. `layoutMessages`).
    fn name(&self) -> &str;

    /// Deliver `value` to the receiving side unchanged.
    fn send(&self, value: Value) -> Result<()>;
}
