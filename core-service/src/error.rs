use bridge_traits::BridgeError;
use core_offline::OfflineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Offline cache error: {0}")]
    Offline(#[from] OfflineError),

    /// A value could not be converted to or from its stored JSON text.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A port delivered a value that does not match the command shape.
    #[error("Invalid {port} command: {message}")]
    InvalidCommand { port: &'static str, message: String },

    /// A storage task was called by a name the shell does not register.
    #[error("Unknown storage task: {0}")]
    UnknownTask(String),
}

impl ServiceError {
    pub fn invalid_command(port: &'static str, err: impl std::fmt::Display) -> Self {
        Self::InvalidCommand {
            port,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
