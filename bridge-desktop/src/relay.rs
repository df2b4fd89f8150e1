//! In-process relay channel

use bridge_traits::{
    error::{BridgeError, Result},
    relay::RelayChannel,
};
use serde_json::Value;
use tokio::sync::mpsc;

/// [`RelayChannel`] that delivers values to a Tokio receiver.
///
/// Stands in for an application port when the shell runs outside a browser.
#[derive(Debug, Clone)]
pub struct ChannelRelay {
    name: String,
    sender: mpsc::UnboundedSender<Value>,
}

impl ChannelRelay {
    /// Create a relay named `name` and the receiving end it feeds.
    pub fn new(name: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<Value>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                name: name.into(),
                sender,
            },
            receiver,
        )
    }
}

impl RelayChannel for ChannelRelay {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, value: Value) -> Result<()> {
        self.sender.send(value).map_err(|_| {
            BridgeError::OperationFailed(format!("relay channel '{}' is closed", self.name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn delivers_values_unchanged() {
        let (relay, mut receiver) = ChannelRelay::new("layoutMessages");

        relay.send(json!({"sidebar": "collapsed"})).unwrap();

        assert_eq!(relay.name(), "layoutMessages");
        assert_eq!(receiver.try_recv().unwrap(), json!({"sidebar": "collapsed"}));
    }

    #[test]
    fn closed_receiver_is_an_error() {
        let (relay, receiver) = ChannelRelay::new("layoutMessages");
        drop(receiver);
        assert!(relay.send(Value::Null).is_err());
    }
}
