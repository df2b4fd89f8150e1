//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the browser shell:
//! - Shell configuration (API endpoint, startup flag keys, caching agent)
//! - Logging and tracing setup
//! - Event bus for cache-status and storage notifications
//!
//! Other crates depend on this one for their configuration types, error
//! conventions and the event stream, never the other way around.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
