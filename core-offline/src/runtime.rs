//! Task spawning and timers for the coordinator.
//!
//! Native builds run on the ambient Tokio runtime. In the browser the
//! coordinator lives on the page's event loop via `spawn_local`.

use std::future::Future;
use std::time::Duration;

use crate::error::{OfflineError, Result};

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn spawn_detached<F>(future: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current().map_err(|_| OfflineError::NoRuntime)?;
    handle.spawn(future);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn spawn_detached<F>(future: F) -> Result<()>
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(target_arch = "wasm32")]
pub(crate) async fn sleep(duration: Duration) {
    gloo_timers::future::sleep(duration).await;
}
