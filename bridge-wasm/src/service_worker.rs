//! Service worker registration through `navigator.serviceWorker`.

use std::cell::RefCell;

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    offline::{
        AgentDescriptor, BackgroundAgentHost, LifecycleSlot, RegistrationRequest,
        RegistrationSnapshot,
    },
    platform::ControlMessageListener,
};
use tracing::trace;
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{MessageEvent, RegistrationOptions, ServiceWorkerContainer, ServiceWorkerRegistration};

use crate::error::WasmError;

fn navigator() -> Option<web_sys::Navigator> {
    web_sys::window().map(|window| window.navigator())
}

fn container() -> BridgeResult<ServiceWorkerContainer> {
    let navigator =
        navigator().ok_or_else(|| BridgeError::NotAvailable("navigator".to_string()))?;
    if !has_service_worker(&navigator) {
        return Err(BridgeError::NotAvailable("navigator.serviceWorker".to_string()));
    }
    Ok(navigator.service_worker())
}

fn has_service_worker(navigator: &web_sys::Navigator) -> bool {
    js_sys::Reflect::has(navigator, &JsValue::from_str("serviceWorker")).unwrap_or(false)
}

/// Message payloads are expected to be JSON text. Structured clones are
/// stringified so the listener always sees text.
fn message_text(data: &JsValue) -> Option<String> {
    if let Some(text) = data.as_string() {
        return Some(text);
    }
    js_sys::JSON::stringify(data).ok().map(String::from)
}

fn snapshot(registration: &ServiceWorkerRegistration) -> RegistrationSnapshot {
    let slots = [
        (LifecycleSlot::Installing, registration.installing()),
        (LifecycleSlot::Waiting, registration.waiting()),
        (LifecycleSlot::Active, registration.active()),
    ];

    slots
        .into_iter()
        .fold(RegistrationSnapshot::new(registration.scope()), |snapshot, (slot, worker)| {
            match worker {
                Some(worker) => snapshot.with_slot(slot, AgentDescriptor::new(worker.script_url())),
                None => snapshot,
            }
        })
}

/// [`BackgroundAgentHost`] backed by the browser's service worker API.
///
/// Only one control-message listener is kept; installing another replaces
/// it, matching `onmessage` assignment.
#[derive(Default)]
pub struct ServiceWorkerHost {
    listener: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>>,
}

impl ServiceWorkerHost {
    /// Create a host for the current page.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl BackgroundAgentHost for ServiceWorkerHost {
    fn supports_background_agent(&self) -> bool {
        navigator().map(|nav| has_service_worker(&nav)).unwrap_or(false)
    }

    async fn register(&self, request: &RegistrationRequest) -> BridgeResult<RegistrationSnapshot> {
        let container = container()?;
        let options = RegistrationOptions::new();
        options.set_scope(&request.scope);

        let promise = container.register_with_options(&request.script_location, &options);
        let registration = JsFuture::from(promise)
            .await
            .map_err(WasmError::from)?
            .dyn_into::<ServiceWorkerRegistration>()
            .map_err(|value| {
                WasmError::UnexpectedValue(format!("expected a registration, got {value:?}"))
            })?;

        Ok(snapshot(&registration))
    }

    fn install_message_listener(&self, listener: ControlMessageListener) -> BridgeResult<()> {
        let container = container()?;
        let closure = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            match message_text(&event.data()) {
                Some(text) => listener(text),
                None => trace!("Dropping service worker message without text form"),
            }
        });

        container.set_onmessage(Some(closure.as_ref().unchecked_ref()));
        self.listener.replace(Some(closure));
        Ok(())
    }
}

impl Drop for ServiceWorkerHost {
    fn drop(&mut self) {
        if self.listener.get_mut().is_some() {
            if let Ok(container) = container() {
                container.set_onmessage(None);
            }
        }
    }
}
