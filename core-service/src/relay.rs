//! Layout message relay.
//!
//! Values the application sends on its outgoing layout port are handed back,
//! unchanged and in order, on the incoming layout port. The shell does not
//! interpret them.

use std::sync::Arc;

use bridge_traits::RelayChannel;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;

#[derive(Clone)]
pub struct LayoutRelay {
    inbound: Arc<dyn RelayChannel>,
}

impl LayoutRelay {
    pub fn new(inbound: Arc<dyn RelayChannel>) -> Self {
        Self { inbound }
    }

    pub fn forward(&self, value: Value) -> Result<()> {
        debug!(channel = self.inbound.name(), payload = %value, "Relaying layout message");
        self.inbound.send(value)?;
        Ok(())
    }
}
