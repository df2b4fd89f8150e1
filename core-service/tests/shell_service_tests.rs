//! Shell façade wired to the desktop adapters.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bridge_desktop::{ChannelRelay, HeadlessPage, MemoryKeyValueStore};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::{
    AgentDescriptor, BackgroundAgentHost, ControlMessageListener, KeyValueStore, LifecycleSlot,
    LogEntry, LogLevel, LoggerSink, RegistrationRequest, RegistrationSnapshot,
};
use core_offline::CoordinatorState;
use core_runtime::config::ShellConfig;
use core_runtime::events::{ShellEvent, StorageEvent};
use core_service::{AppPorts, ServiceError, ShellService};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Default)]
struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingSink {
    fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|entry| (entry.level, entry.message.clone()))
            .collect()
    }
}

#[async_trait]
impl LoggerSink for RecordingSink {
    async fn log(&self, entry: LogEntry) -> BridgeResult<()> {
        self.entries.lock().unwrap().push(entry);
        Ok(())
    }
}

/// Host that accepts the registration with an active worker.
#[derive(Default)]
struct ActiveHost {
    listener: Mutex<Option<ControlMessageListener>>,
}

impl ActiveHost {
    fn post(&self, raw: &str) {
        if let Some(listener) = self.listener.lock().unwrap().as_ref() {
            listener(raw.to_string());
        }
    }
}

#[async_trait]
impl BackgroundAgentHost for ActiveHost {
    fn supports_background_agent(&self) -> bool {
        true
    }

    async fn register(&self, request: &RegistrationRequest) -> BridgeResult<RegistrationSnapshot> {
        Ok(RegistrationSnapshot::new(&request.scope).with_slot(
            LifecycleSlot::Active,
            AgentDescriptor::new(&request.script_location),
        ))
    }

    fn install_message_listener(&self, listener: ControlMessageListener) -> BridgeResult<()> {
        *self.listener.lock().unwrap() = Some(listener);
        Ok(())
    }
}

struct Harness {
    shell: ShellService,
    store: Arc<MemoryKeyValueStore>,
    sink: Arc<RecordingSink>,
}

fn harness(items: &[(&str, &str)]) -> Harness {
    let store = Arc::new(MemoryKeyValueStore::with_items(items.iter().copied()));
    let sink = Arc::new(RecordingSink::default());
    let shell = ShellService::builder()
        .store(store.clone())
        .logger(sink.clone())
        .build()
        .unwrap();

    Harness { shell, store, sink }
}

fn ready(shell: &ShellService) -> (core_service::PortHandlers, UnboundedReceiver<Value>) {
    let (layout_messages, inbound) = ChannelRelay::new("layoutMessages");
    let handlers = shell.on_ready(AppPorts {
        layout_messages: Arc::new(layout_messages),
    });
    (handlers, inbound)
}

#[test]
fn flags_come_from_storage_and_config() {
    let Harness { shell, .. } = harness(&[("credentials", r#"{"token":"t-1"}"#)]);

    let flags = shell.flags().unwrap();

    assert_eq!(flags.credentials(), &json!({"token": "t-1"}));
    assert_eq!(flags.classrooms(), &Value::Null);
    assert_eq!(flags.api, "http://localhost:8000/api/v1");
}

#[tokio::test]
async fn stored_values_become_next_flags() {
    let Harness { shell, store, .. } = harness(&[]);
    let mut events = shell.events().subscribe();
    let (handlers, _inbound) = ready(&shell);

    handlers
        .store(json!({"key": "classrooms", "value": [{"id": 3}]}))
        .await
        .unwrap();

    assert_eq!(
        store.get_item("classrooms").unwrap().as_deref(),
        Some(r#"[{"id":3}]"#)
    );
    assert_eq!(shell.flags().unwrap().classrooms(), &json!([{"id": 3}]));
    assert_eq!(
        events.recv().await.unwrap(),
        ShellEvent::Storage(StorageEvent::Written {
            key: "classrooms".to_string()
        })
    );
}

#[test]
fn storage_tasks_share_the_flag_store() {
    let Harness { shell, .. } = harness(&[("classrooms", "[1]")]);
    let tasks = shell.storage_tasks();

    assert_eq!(tasks.call("localGet", json!("classrooms")).unwrap(), json!("[1]"));

    tasks
        .call(
            "localPut",
            json!({"key": "credentials", "value": r#"{"token":"t-2"}"#}),
        )
        .unwrap();
    assert_eq!(shell.flags().unwrap().credentials(), &json!({"token": "t-2"}));

    tasks.call("localClear", json!("")).unwrap();
    assert_eq!(shell.flags().unwrap().classrooms(), &Value::Null);
}

#[tokio::test]
async fn malformed_store_command_is_reported_and_port_keeps_working() {
    let Harness { shell, store, sink } = harness(&[]);
    let (handlers, _inbound) = ready(&shell);

    let result = handlers.store(json!({"value": 1})).await;
    assert!(matches!(result, Err(ServiceError::InvalidCommand { .. })));

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, LogLevel::Error);
    assert!(entries[0].1.starts_with("Failed to store value: Invalid sendToLocalStorage command"));

    handlers
        .store(json!({"key": "credentials", "value": null}))
        .await
        .unwrap();
    assert_eq!(store.get_item("credentials").unwrap().as_deref(), Some("null"));
}

#[tokio::test]
async fn log_commands_reach_the_sink() {
    let Harness { shell, sink, .. } = harness(&[]);
    let (handlers, _inbound) = ready(&shell);

    handlers
        .log(json!({"level": "warn", "title": "Slow response", "data": {"ms": 900}}))
        .await
        .unwrap();
    handlers
        .log(json!({"level": "celebrate", "title": "Joined classroom"}))
        .await
        .unwrap();

    assert_eq!(
        sink.entries(),
        vec![
            (LogLevel::Warn, "warn: Slow response".to_string()),
            (LogLevel::Info, "celebrate: Joined classroom".to_string()),
        ]
    );
}

#[test]
fn layout_messages_are_echoed_back() {
    let Harness { shell, .. } = harness(&[]);
    let (handlers, mut inbound) = ready(&shell);

    handlers.layout(json!({"theme": "dark"})).unwrap();
    handlers.layout(json!("toggle")).unwrap();

    assert_eq!(inbound.try_recv().unwrap(), json!({"theme": "dark"}));
    assert_eq!(inbound.try_recv().unwrap(), json!("toggle"));
    assert!(inbound.try_recv().is_err());
}

#[tokio::test]
async fn headless_host_leaves_cache_unsupported() {
    let Harness { shell, sink, .. } = harness(&[]);
    let mut states = shell.coordinator().subscribe();

    shell.start_offline_cache().unwrap();

    tokio::time::timeout(
        Duration::from_secs(1),
        states.wait_for(CoordinatorState::is_terminal),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(shell.coordinator().state(), CoordinatorState::Unsupported);
    assert!(sink.entries().is_empty());
}

#[tokio::test]
async fn refresh_from_agent_reloads_page() {
    let host = Arc::new(ActiveHost::default());
    let page = Arc::new(HeadlessPage::new());
    let sink = Arc::new(RecordingSink::default());
    let shell = ShellService::builder()
        .agent_host(host.clone())
        .page(page.clone())
        .logger(sink.clone())
        .build()
        .unwrap();

    shell.coordinator().initialize().await;
    host.post(r#"{"type":"refresh"}"#);
    host.post(r#"{"type":"uncachable-response","status":302}"#);

    assert_eq!(page.reload_count(), 1);
    assert_eq!(
        sink.entries(),
        vec![(LogLevel::Info, "Service worker active".to_string())]
    );
    assert!(shell.coordinator().is_caching_enabled());
}

#[test]
fn desktop_defaults_fill_missing_adapters() {
    let shell = ShellService::builder().build().unwrap();
    assert_eq!(shell.config(), &ShellConfig::default());
    assert_eq!(shell.coordinator().state(), CoordinatorState::Uninitialized);
}

#[test]
fn invalid_config_is_rejected() {
    let config = ShellConfig {
        api_endpoint: String::new(),
        ..ShellConfig::default()
    };

    let result = ShellService::builder().config(config).build();

    assert!(matches!(
        result,
        Err(ServiceError::Runtime(core_runtime::Error::Config(_)))
    ));
}
