//! Browser console logger sink

use async_trait::async_trait;
use bridge_traits::{
    error::Result as BridgeResult,
    logging::{LogEntry, LogLevel, LoggerSink},
};
use wasm_bindgen::JsValue;

/// Writes [`LogEntry`] values to the browser console.
///
/// The console method follows the entry level (`console.error` for errors,
/// `console.warn` for warnings, and so on). Structured fields are passed as a
/// second argument so the devtools render them as an inspectable object.
/// Fields holding JSON text are parsed back first.
#[derive(Debug, Clone, Default)]
pub struct ConsoleLoggerSink;

impl ConsoleLoggerSink {
    /// Create a console sink.
    pub fn new() -> Self {
        Self
    }
}

fn fields_object(entry: &LogEntry) -> Option<JsValue> {
    if entry.fields.is_empty() {
        return None;
    }

    let object = js_sys::Object::new();
    for (key, value) in &entry.fields {
        let rendered = js_sys::JSON::parse(value).unwrap_or_else(|_| JsValue::from_str(value));
        // Reflect::set only fails on frozen objects.
        let _ = js_sys::Reflect::set(&object, &JsValue::from_str(key), &rendered);
    }
    Some(object.into())
}

#[async_trait(?Send)]
impl LoggerSink for ConsoleLoggerSink {
    async fn log(&self, entry: LogEntry) -> BridgeResult<()> {
        let message = JsValue::from_str(&entry.message);

        match (entry.level, fields_object(&entry)) {
            (LogLevel::Error, None) => web_sys::console::error_1(&message),
            (LogLevel::Error, Some(fields)) => web_sys::console::error_2(&message, &fields),
            (LogLevel::Warn, None) => web_sys::console::warn_1(&message),
            (LogLevel::Warn, Some(fields)) => web_sys::console::warn_2(&message, &fields),
            (LogLevel::Info, None) => web_sys::console::log_1(&message),
            (LogLevel::Info, Some(fields)) => web_sys::console::log_2(&message, &fields),
            (LogLevel::Debug | LogLevel::Trace, None) => web_sys::console::debug_1(&message),
            (LogLevel::Debug | LogLevel::Trace, Some(fields)) => {
                web_sys::console::debug_2(&message, &fields)
            }
        }

        Ok(())
    }

    fn min_level(&self) -> LogLevel {
        LogLevel::Trace
    }
}
