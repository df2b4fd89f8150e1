//! Application ports.
//!
//! The UI application exposes named ports on `app.ports`. Outgoing ports
//! (application to shell) have a `subscribe(callback)` method; incoming ports
//! (shell to application) have a `send(value)` method.

use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    relay::RelayChannel,
};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};

use crate::error::{WasmError, WasmResult};

/// Read the `ports` object of an application handle. `None` when the
/// application declares no ports.
pub fn app_ports(app: &JsValue) -> Option<JsValue> {
    js_sys::Reflect::get(app, &JsValue::from_str("ports"))
        .ok()
        .filter(|ports| !ports.is_undefined() && !ports.is_null())
}

/// Convert a JavaScript value into JSON.
pub fn to_json(value: JsValue) -> WasmResult<Value> {
    if value.is_undefined() {
        return Ok(Value::Null);
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Convert JSON into a plain JavaScript value (objects, not `Map`s).
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> WasmResult<JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

/// One named port of the application.
#[derive(Debug, Clone)]
pub struct AppPort {
    name: String,
    port: JsValue,
}

impl AppPort {
    /// Look up `name` on a `ports` object.
    pub fn lookup(ports: &JsValue, name: &str) -> WasmResult<Self> {
        let port = js_sys::Reflect::get(ports, &JsValue::from_str(name))?;
        if port.is_undefined() || port.is_null() {
            return Err(WasmError::NotAvailable(format!("port '{name}'")));
        }
        Ok(Self {
            name: name.to_string(),
            port,
        })
    }

    fn method(&self, method: &str) -> WasmResult<js_sys::Function> {
        js_sys::Reflect::get(&self.port, &JsValue::from_str(method))?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| {
                WasmError::UnexpectedValue(format!("port '{}' has no {method}()", self.name))
            })
    }

    /// Subscribe to an outgoing port. Every value the application sends is
    /// converted to JSON and handed to `handler`.
    ///
    /// The callback lives for the rest of the page's lifetime.
    pub fn subscribe<F>(&self, mut handler: F) -> WasmResult<()>
    where
        F: FnMut(Value) + 'static,
    {
        let subscribe = self.method("subscribe")?;
        let name = self.name.clone();
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            match to_json(value) {
                Ok(value) => handler(value),
                Err(err) => tracing::warn!(port = %name, error = %err, "Dropping port value"),
            }
        });

        subscribe.call1(&self.port, callback.as_ref())?;
        callback.forget();
        Ok(())
    }

    /// Push a value into an incoming port.
    pub fn push(&self, value: &Value) -> WasmResult<()> {
        let send = self.method("send")?;
        send.call1(&self.port, &to_js(value)?)?;
        Ok(())
    }
}

impl RelayChannel for AppPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn send(&self, value: Value) -> BridgeResult<()> {
        self.push(&value).map_err(BridgeError::from)
    }
}
