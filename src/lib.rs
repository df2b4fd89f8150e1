//! Workspace placeholder crate.
//!
//! This crate exposes the shared feature flags that map to the individual
//! workspace crates (`core-service`, `core-offline`). Host shells can depend on
//! `codehood-shell` and pick `desktop-shims` or `wasm` without wiring each
//! crate individually.

#[cfg(any(feature = "desktop-shims", feature = "wasm"))]
pub use core_offline as offline;
#[cfg(any(feature = "desktop-shims", feature = "wasm"))]
pub use core_service as service;
