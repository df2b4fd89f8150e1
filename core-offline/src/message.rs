//! Control messages posted by the caching agent to the page.
//!
//! The wire envelope is a JSON object with a string `type` discriminant:
//!
//! ```json
//! { "type": "refresh" }
//! { "type": "uncachable-response", "status": 404, "url": "/api/v1/classrooms" }
//! ```
//!
//! Unknown discriminants decode to [`ControlMessage::Unrecognized`] rather
//! than failing, so new agent versions never break an older page.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{OfflineError, Result};

/// Discriminant asking the page to reload.
pub const REFRESH: &str = "refresh";

/// Discriminant reporting a fetched response with a failure status (>= 300).
pub const UNCACHABLE_RESPONSE: &str = "uncachable-response";

#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// Reload the page.
    Refresh,
    /// The agent fetched a resource whose response it refused to cache.
    UncachableResponse(UncachableResponse),
    /// Any other discriminant.
    Unrecognized(String),
}

/// Payload of an `uncachable-response` message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UncachableResponse {
    /// HTTP status of the response, when the agent reported one
    pub status: Option<u16>,
    /// Every envelope field except `type`
    pub payload: Map<String, Value>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl ControlMessage {
    /// Decode the raw text of a message.
    ///
    /// # Errors
    ///
    /// [`OfflineError::MalformedMessage`] when the text is not JSON, is not an
    /// object, or has no string `type`.
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str::<Envelope>(raw)
            .map(Self::from_envelope)
            .map_err(|e| OfflineError::MalformedMessage(e.to_string()))
    }

    /// Decode an already-structured message.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value::<Envelope>(value)
            .map(Self::from_envelope)
            .map_err(|e| OfflineError::MalformedMessage(e.to_string()))
    }

    fn from_envelope(envelope: Envelope) -> Self {
        match envelope.kind.as_str() {
            REFRESH => Self::Refresh,
            UNCACHABLE_RESPONSE => {
                let status = envelope
                    .payload
                    .get("status")
                    .and_then(Value::as_u64)
                    .and_then(|status| u16::try_from(status).ok());
                Self::UncachableResponse(UncachableResponse {
                    status,
                    payload: envelope.payload,
                })
            }
            _ => Self::Unrecognized(envelope.kind),
        }
    }

    /// The wire discriminant of this message.
    pub fn kind(&self) -> &str {
        match self {
            Self::Refresh => REFRESH,
            Self::UncachableResponse(_) => UNCACHABLE_RESPONSE,
            Self::Unrecognized(kind) => kind,
        }
    }
}
