//! # Shell Configuration
//!
//! Static configuration for the browser shell: where the remote API lives,
//! which durable-storage keys seed the application at startup, and how the
//! offline caching agent is registered.
//!
//! Everything here is fixed at build/boot time. Nothing is read back from
//! durable storage; in particular the API endpoint is a constant, not a
//! persisted setting.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::{RegistrationTimeout, ShellConfig};
//! use std::time::Duration;
//!
//! let config = ShellConfig::builder()
//!     .api_endpoint("https://codehood.example/api/v1")
//!     .registration_timeout(RegistrationTimeout::Bounded(Duration::from_secs(30)))
//!     .build()?;
//!
//! assert_eq!(config.offline.script_location, "/static/sw.js");
//! # Ok::<(), core_runtime::Error>(())
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API base endpoint handed to the application in its startup flags.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8000/api/v1";

/// Name of the startup flag carrying the API endpoint.
pub const API_FLAG: &str = "api";

/// Durable-storage keys read once at startup.
pub const DEFAULT_FLAG_KEYS: [&str; 2] = ["credentials", "classrooms"];

/// Script the background caching agent is installed from.
pub const DEFAULT_AGENT_SCRIPT: &str = "/static/sw.js";

/// Path prefix controlled by the background caching agent.
pub const DEFAULT_AGENT_SCOPE: &str = "/";

/// How long the coordinator waits for the host to settle a registration.
///
/// The host gives no guarantee that a registration ever resolves. The
/// default, [`RegistrationTimeout::Unbounded`], waits forever: a registration
/// that never settles leaves the coordinator in `registering` for the life of
/// the page. [`RegistrationTimeout::Bounded`] is an explicit opt-in; when it
/// expires the attempt is treated as a failed registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegistrationTimeout {
    #[default]
    Unbounded,
    Bounded(Duration),
}

/// Registration parameters for the background caching agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineConfig {
    /// Agent script location (absolute path)
    pub script_location: String,
    /// Path prefix the agent controls (absolute path)
    pub scope: String,
    /// Supervision policy for the registration attempt
    pub registration_timeout: RegistrationTimeout,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            script_location: DEFAULT_AGENT_SCRIPT.to_string(),
            scope: DEFAULT_AGENT_SCOPE.to_string(),
            registration_timeout: RegistrationTimeout::default(),
        }
    }
}

impl OfflineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.script_location.starts_with('/') {
            return Err(Error::Config(format!(
                "Agent script location must be an absolute path, got '{}'",
                self.script_location
            )));
        }

        if !self.scope.starts_with('/') {
            return Err(Error::Config(format!(
                "Agent scope must be an absolute path prefix, got '{}'",
                self.scope
            )));
        }

        if self.registration_timeout == RegistrationTimeout::Bounded(Duration::ZERO) {
            return Err(Error::Config(
                "Bounded registration timeout must be greater than zero. \
                 Use RegistrationTimeout::Unbounded to wait indefinitely."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// Shell configuration.
///
/// Use [`ShellConfig::builder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// API base endpoint passed to the application as the `api` flag
    pub api_endpoint: String,

    /// Durable-storage keys loaded into the startup flags
    pub flag_keys: Vec<String>,

    /// Background caching agent registration
    pub offline: OfflineConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            flag_keys: DEFAULT_FLAG_KEYS.iter().map(|key| key.to_string()).collect(),
            offline: OfflineConfig::default(),
        }
    }
}

impl ShellConfig {
    pub fn builder() -> ShellConfigBuilder {
        ShellConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when:
    /// - the API endpoint is empty
    /// - a flag key is empty, listed twice, or shadows the `api` flag
    /// - the offline configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.trim().is_empty() {
            return Err(Error::Config("API endpoint cannot be empty".to_string()));
        }

        for (index, key) in self.flag_keys.iter().enumerate() {
            if key.is_empty() {
                return Err(Error::Config("Flag keys cannot be empty".to_string()));
            }
            if key == API_FLAG {
                return Err(Error::Config(format!(
                    "Flag key '{API_FLAG}' is reserved for the API endpoint"
                )));
            }
            if self.flag_keys[..index].contains(key) {
                return Err(Error::Config(format!("Flag key '{key}' is listed twice")));
            }
        }

        self.offline.validate()
    }
}

/// Builder for [`ShellConfig`].
#[derive(Debug, Default)]
pub struct ShellConfigBuilder {
    api_endpoint: Option<String>,
    flag_keys: Option<Vec<String>>,
    script_location: Option<String>,
    scope: Option<String>,
    registration_timeout: Option<RegistrationTimeout>,
}

impl ShellConfigBuilder {
    /// Sets the API base endpoint.
    ///
    /// Default: `http://localhost:8000/api/v1`
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(endpoint.into());
        self
    }

    /// Replaces the list of durable-storage keys loaded at startup.
    pub fn flag_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flag_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the agent script location.
    ///
    /// Default: `/static/sw.js`
    pub fn script_location(mut self, location: impl Into<String>) -> Self {
        self.script_location = Some(location.into());
        self
    }

    /// Sets the agent scope.
    ///
    /// Default: `/`
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the registration supervision policy.
    ///
    /// Default: [`RegistrationTimeout::Unbounded`]
    pub fn registration_timeout(mut self, timeout: RegistrationTimeout) -> Self {
        self.registration_timeout = Some(timeout);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<ShellConfig> {
        let defaults = ShellConfig::default();

        let config = ShellConfig {
            api_endpoint: self.api_endpoint.unwrap_or(defaults.api_endpoint),
            flag_keys: self.flag_keys.unwrap_or(defaults.flag_keys),
            offline: OfflineConfig {
                script_location: self
                    .script_location
                    .unwrap_or(defaults.offline.script_location),
                scope: self.scope.unwrap_or(defaults.offline.scope),
                registration_timeout: self
                    .registration_timeout
                    .unwrap_or(defaults.offline.registration_timeout),
            },
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shell_contract() {
        let config = ShellConfig::builder().build().unwrap();

        assert_eq!(config.api_endpoint, "http://localhost:8000/api/v1");
        assert_eq!(config.flag_keys, vec!["credentials", "classrooms"]);
        assert_eq!(config.offline.script_location, "/static/sw.js");
        assert_eq!(config.offline.scope, "/");
        assert_eq!(
            config.offline.registration_timeout,
            RegistrationTimeout::Unbounded
        );
    }

    #[test]
    fn test_builder_overrides() {
        let config = ShellConfig::builder()
            .api_endpoint("https://api.codehood.example/v1")
            .flag_keys(["credentials"])
            .script_location("/sw.js")
            .scope("/app/")
            .registration_timeout(RegistrationTimeout::Bounded(Duration::from_secs(5)))
            .build()
            .unwrap();

        assert_eq!(config.api_endpoint, "https://api.codehood.example/v1");
        assert_eq!(config.flag_keys, vec!["credentials"]);
        assert_eq!(config.offline.script_location, "/sw.js");
        assert_eq!(config.offline.scope, "/app/");
        assert_eq!(
            config.offline.registration_timeout,
            RegistrationTimeout::Bounded(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_rejects_empty_endpoint() {
        let result = ShellConfig::builder().api_endpoint("  ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_relative_script_location() {
        let result = ShellConfig::builder().script_location("static/sw.js").build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("static/sw.js"));
    }

    #[test]
    fn test_rejects_relative_scope() {
        let result = ShellConfig::builder().scope("app").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_bounded_timeout() {
        let result = ShellConfig::builder()
            .registration_timeout(RegistrationTimeout::Bounded(Duration::ZERO))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_reserved_flag_key() {
        let result = ShellConfig::builder().flag_keys(["credentials", "api"]).build();
        assert!(result.unwrap_err().to_string().contains("reserved"));
    }

    #[test]
    fn test_rejects_duplicate_flag_keys() {
        let result = ShellConfig::builder()
            .flag_keys(["credentials", "credentials"])
            .build();
        assert!(result.unwrap_err().to_string().contains("listed twice"));
    }
}
