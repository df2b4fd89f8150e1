//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// A browser global (`window`, `navigator`, `localStorage`, ...) is missing
    #[error("Browser API not available: {0}")]
    NotAvailable(String),

    /// A browser call threw or rejected. Holds the JavaScript rendering of the
    /// thrown value (`TypeError: ...` for `Error` objects).
    #[error("{0}")]
    JavaScript(String),

    /// A JavaScript value did not have the expected shape
    #[error("Unexpected value: {0}")]
    UnexpectedValue(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Conversion between Rust and JavaScript values failed
    #[error("Value conversion error: {0}")]
    Conversion(String),
}

impl From<serde_wasm_bindgen::Error> for WasmError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        WasmError::Conversion(err.to_string())
    }
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::NotAvailable(what) => BridgeError::NotAvailable(what),
            WasmError::JavaScript(message) => BridgeError::Rejected(message),
            WasmError::Serialization(err) => BridgeError::Serialization(err),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::JavaScript(describe_js_value(&js_value))
    }
}

/// Render a thrown JavaScript value the way string interpolation would.
pub fn describe_js_value(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        text
    } else if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.to_string())
    } else {
        format!("{value:?}")
    }
}
