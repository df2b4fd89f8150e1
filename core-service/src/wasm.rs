//! Browser entry points.
//!
//! ```javascript
//! import init, { flags, onReady, registerServiceWorker } from "./codehood_shell.js";
//!
//! await init();
//! installLocalStorage(TaskPort, "1.0.0");
//! const app = Elm.Main.init({ flags: flags({ env }) });
//! onReady({ env, app });
//! ```
//!
//! Module start-up registers the service worker on its own, the same as
//! calling `registerServiceWorker()`.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use bridge_wasm::{
    app_ports, build_browser_bridges,
    ports::{to_js, to_json},
    AppPort, WasmError,
};
use core_runtime::config::ShellConfig;
use core_runtime::logging::{init_logging, LoggingConfig};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::ports::{AppPorts, LAYOUT_IN_PORT, LAYOUT_OUT_PORT, LOG_PORT, STORE_PORT};
use crate::tasks::{TASK_NAMES, TASK_NAMESPACE};
use crate::ShellService;

thread_local! {
    static SHELL: RefCell<Option<Rc<ShellService>>> = const { RefCell::new(None) };
}

fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

/// Build the shell on the browser adapters.
pub fn bootstrap_browser(config: ShellConfig) -> crate::Result<ShellService> {
    let bridges = build_browser_bridges()?;
    ShellService::builder()
        .config(config)
        .store(bridges.store)
        .logger(bridges.logger)
        .agent_host(bridges.agent_host)
        .page(bridges.page)
        .build()
}

fn shell() -> anyhow::Result<Rc<ShellService>> {
    SHELL.with(|slot| {
        if let Some(shell) = slot.borrow().as_ref() {
            return Ok(Rc::clone(shell));
        }

        let shell = Rc::new(bootstrap_browser(ShellConfig::default()).context("starting shell")?);
        *slot.borrow_mut() = Some(Rc::clone(&shell));
        Ok(shell)
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Fails only when the host page installed its own subscriber first.
    let _ = init_logging(LoggingConfig::default());
    register_service_worker()
}

/// Startup flags for the application: one field per configured storage key
/// plus `api`.
#[wasm_bindgen]
pub fn flags(_context: JsValue) -> Result<JsValue, JsValue> {
    let flags = shell()
        .and_then(|shell| shell.flags().context("loading flags"))
        .map_err(to_js_error)?;
    to_js(&flags).map_err(|err| to_js_error(err.into()))
}

/// Subscribe the application's ports. Does nothing when the application has
/// no ports.
#[wasm_bindgen(js_name = onReady)]
pub fn on_ready(context: JsValue) -> Result<(), JsValue> {
    bind_ports(&context).map_err(to_js_error)
}

fn bind_ports(context: &JsValue) -> anyhow::Result<()> {
    let app = js_sys::Reflect::get(context, &JsValue::from_str("app"))
        .map_err(WasmError::from)
        .context("reading app")?;
    let Some(ports) = app_ports(&app) else {
        return Ok(());
    };

    let port = |name: &str| {
        AppPort::lookup(&ports, name).with_context(|| format!("looking up port {name}"))
    };

    let layout_messages = port(LAYOUT_IN_PORT)?;
    let handlers = shell()?.on_ready(AppPorts {
        layout_messages: Arc::new(layout_messages),
    });

    let store = handlers.clone();
    port(STORE_PORT)?.subscribe(move |value| {
        let store = store.clone();
        spawn_local(async move {
            // Already reported to the logger sink.
            let _ = store.store(value).await;
        });
    })?;

    let log = handlers.clone();
    port(LOG_PORT)?.subscribe(move |value| {
        let log = log.clone();
        spawn_local(async move {
            if let Err(err) = log.log(value).await {
                warn!(error = %err, "Log command dropped");
            }
        });
    })?;

    port(LAYOUT_OUT_PORT)?.subscribe(move |value| {
        if let Err(err) = handlers.layout(value) {
            warn!(error = %err, "Layout message dropped");
        }
    })?;

    Ok(())
}

/// Register the storage tasks with the page's task-port runtime.
///
/// With a `version`, the tasks go into the storage namespace created through
/// `taskPort.createNamespace`; without one they are registered globally.
#[wasm_bindgen(js_name = installLocalStorage)]
pub fn install_local_storage(task_port: JsValue, version: Option<String>) -> Result<(), JsValue> {
    install_tasks(&task_port, version).map_err(to_js_error)
}

fn install_tasks(task_port: &JsValue, version: Option<String>) -> anyhow::Result<()> {
    let registry = match version {
        Some(version) => {
            let create = js_function(task_port, "createNamespace")?;
            create
                .call2(
                    task_port,
                    &JsValue::from_str(TASK_NAMESPACE),
                    &JsValue::from_str(&version),
                )
                .map_err(WasmError::from)
                .context("creating storage namespace")?
        }
        None => task_port.clone(),
    };
    let register = js_function(&registry, "register")?;
    let tasks = shell()?.storage_tasks();

    for name in TASK_NAMES {
        let tasks = tasks.clone();
        let handler = Closure::<dyn Fn(JsValue) -> Result<JsValue, JsValue>>::new(
            move |args: JsValue| {
                let args = to_json(args).map_err(|err| to_js_error(err.into()))?;
                let result = tasks
                    .call(name, args)
                    .map_err(|err| to_js_error(err.into()))?;
                to_js(&result).map_err(|err| to_js_error(err.into()))
            },
        );

        register
            .call2(&registry, &JsValue::from_str(name), handler.as_ref())
            .map_err(WasmError::from)
            .with_context(|| format!("registering task {name}"))?;
        // Registered tasks live as long as the page.
        handler.forget();
    }

    Ok(())
}

fn js_function(target: &JsValue, name: &str) -> anyhow::Result<js_sys::Function> {
    js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map_err(WasmError::from)?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| anyhow!("task port has no {name} function"))
}

/// Register the offline caching agent. Safe to call more than once; only
/// the first call registers.
#[wasm_bindgen(js_name = registerServiceWorker)]
pub fn register_service_worker() -> Result<(), JsValue> {
    shell()
        .and_then(|shell| shell.start_offline_cache().context("registering service worker"))
        .map_err(to_js_error)
}

/// Current offline-cache state, e.g. `{ "state": "registered", "slot": "active", "scope": "/" }`.
#[wasm_bindgen(js_name = cacheStatus)]
pub fn cache_status() -> Result<JsValue, JsValue> {
    let state = shell().map_err(to_js_error)?.coordinator().state();
    to_js(&state).map_err(|err| to_js_error(anyhow!(err)))
}
