use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

// ── Top-level config ────────────────────────────────────────────────

/// Host runner configuration, parsed from `takt.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Maximum time to wait for one service to stop during shutdown.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,

    /// Per-service overrides, keyed by service name.
    #[serde(default)]
    pub services: HashMap<String, ServiceConfig>,
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            services: HashMap::new(),
        }
    }
}

impl HostConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&raw)?)
    }

    /// Built-in defaults, for hosts run without a config file.
    pub fn local() -> Self {
        Self::default()
    }

    /// Shutdown timeout as a [`Duration`].
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Cadence for the named service: its configured override, or the
    /// service's own default.
    pub fn cadence_for(&self, name: &str, default: Duration) -> Duration {
        self.services
            .get(name)
            .and_then(|s| s.cadence_ms)
            .map(Duration::from_millis)
            .unwrap_or(default)
    }
}

// ── Section configs ─────────────────────────────────────────────────

/// Overrides for a single named service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Cycle cadence override in milliseconds.
    pub cadence_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HostConfig::local();
        assert_eq!(config.shutdown_timeout_secs, 10);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
        assert!(config.services.is_empty());
    }

    #[test]
    fn parse_minimal() {
        let config: HostConfig = toml::from_str("").unwrap();
        assert_eq!(config.shutdown_timeout_secs, 10);
    }

    #[test]
    fn parse_full() {
        let config: HostConfig = toml::from_str(
            r#"
            shutdown_timeout_secs = 3

            [services.heartbeat]
            cadence_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.shutdown_timeout_secs, 3);
        assert_eq!(
            config.cadence_for("heartbeat", Duration::from_secs(1)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn cadence_falls_back_to_default() {
        let config = HostConfig::local();
        assert_eq!(
            config.cadence_for("unknown", Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }
}
