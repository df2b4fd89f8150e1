use bridge_traits::BridgeError;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OfflineError {
    /// The host rejected or failed the registration attempt. Displays the
    /// host's own error text.
    #[error("{0}")]
    Registration(#[source] BridgeError),

    /// The bounded registration timeout expired before the host settled.
    #[error("registration did not settle within {0:?}")]
    TimedOut(Duration),

    /// A control message could not be decoded.
    #[error("malformed control message: {0}")]
    MalformedMessage(String),

    /// No executor is available to run the coordinator task.
    #[error("no async runtime available to start the coordinator")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, OfflineError>;
