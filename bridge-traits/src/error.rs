use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The host refused the request. The message is the host's own rendering
    /// of the failure and is displayed verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_renders_host_message_verbatim() {
        let err = BridgeError::Rejected("TypeError: network failure".into());
        assert_eq!(err.to_string(), "TypeError: network failure");
    }

    #[test]
    fn not_available_names_capability() {
        let err = BridgeError::NotAvailable("localStorage".into());
        assert!(err.to_string().contains("localStorage"));
    }
}
