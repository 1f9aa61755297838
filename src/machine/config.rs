//! Machine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings for a machine.
///
/// Every field has a default, so partial documents are accepted.
///
/// # Example
///
/// ```rust
/// use cadence::machine::MachineConfig;
/// use std::time::Duration;
///
/// let config = MachineConfig::from_json(r#"{ "name": "door", "hook_timeout_ms": 250 }"#).unwrap();
///
/// assert_eq!(config.name, "door");
/// assert_eq!(config.hook_timeout(), Some(Duration::from_millis(250)));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Label attached to the machine's log span
    pub name: String,

    /// Upper bound for a single hook, in milliseconds. `None` waits forever.
    pub hook_timeout_ms: Option<u64>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: "machine".to_string(),
            hook_timeout_ms: None,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Bound every hook by `timeout`, rounded up to whole milliseconds.
    pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.hook_timeout_ms = Some(millis.min(u64::MAX as u128) as u64);
        self
    }

    pub fn hook_timeout(&self) -> Option<Duration> {
        self.hook_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_timeout() {
        let config = MachineConfig::default();
        assert_eq!(config.name, "machine");
        assert_eq!(config.hook_timeout(), None);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = MachineConfig::from_json(r#"{ "hook_timeout_ms": 5 }"#).unwrap();
        assert_eq!(config.name, "machine");
        assert_eq!(config.hook_timeout(), Some(Duration::from_millis(5)));

        let empty = MachineConfig::from_json("{}").unwrap();
        assert_eq!(empty, MachineConfig::default());
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = MachineConfig::from_json(r#"{ "hook_timeout_ms": "soon" }"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid machine configuration"));
    }

    #[test]
    fn builder_methods_set_fields() {
        let config = MachineConfig::default()
            .with_name("checkout")
            .with_hook_timeout(Duration::from_secs(2));

        assert_eq!(config.name, "checkout");
        assert_eq!(config.hook_timeout_ms, Some(2000));
    }

    #[test]
    fn sub_millisecond_timeouts_round_up() {
        let config = MachineConfig::default().with_hook_timeout(Duration::from_micros(300));
        assert_eq!(config.hook_timeout(), Some(Duration::from_millis(1)));

        let config = MachineConfig::default().with_hook_timeout(Duration::from_micros(2_500));
        assert_eq!(config.hook_timeout_ms, Some(3));
    }
}
