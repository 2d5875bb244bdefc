// SPDX-License-Identifier: Apache-2.0

//! Configuration for the shard export client.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Connection options for [`UnaryExportClient`](crate::UnaryExportClient).
///
/// The configuration is immutable once passed to `connect`: the concurrency
/// level fixes both the worker count and the default queue capacity for the
/// lifetime of the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportClientConfig {
    /// Endpoint URI of the collector, e.g. `http://127.0.0.1:4317`.
    pub endpoint: String,

    /// Number of concurrent unary calls kept in flight. Also the default
    /// capacity of the send queue, so the backlog never exceeds one queued
    /// request per idle worker.
    #[serde(default = "default_send_concurrency")]
    pub send_concurrency: usize,

    /// Optional send queue capacity override for smoothing bursty
    /// producers. Defaults to `send_concurrency` when unset.
    #[serde(default)]
    pub queue_capacity: Option<usize>,
}

fn default_send_concurrency() -> usize {
    4
}

impl Default for ExportClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:4317".to_string(),
            send_concurrency: default_send_concurrency(),
            queue_capacity: None,
        }
    }
}

impl ExportClientConfig {
    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::invalid_config("endpoint cannot be empty"));
        }

        if self.send_concurrency == 0 {
            return Err(Error::invalid_config(
                "send_concurrency must be greater than zero",
            ));
        }

        if self.queue_capacity == Some(0) {
            return Err(Error::invalid_config(
                "queue_capacity must be greater than zero when set",
            ));
        }

        Ok(())
    }

    /// Capacity of the send queue: the explicit override if set, otherwise
    /// the concurrency level.
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.send_concurrency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = ExportClientConfig::default();
        assert!(config.validate().is_ok());

        config.send_concurrency = 0;
        assert!(config.validate().is_err());

        config.send_concurrency = 2;
        assert!(config.validate().is_ok());

        config.endpoint = "  ".to_string();
        assert!(config.validate().is_err());

        config.endpoint = "http://collector:4317".to_string();
        config.queue_capacity = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_queue_capacity_defaults_to_concurrency() {
        let mut config = ExportClientConfig {
            send_concurrency: 8,
            ..Default::default()
        };
        assert_eq!(config.effective_queue_capacity(), 8);

        config.queue_capacity = Some(32);
        assert_eq!(config.effective_queue_capacity(), 32);
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = r#"
endpoint: "http://1.2.3.4:1234"
send_concurrency: 123
"#;
        let config: ExportClientConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.endpoint, "http://1.2.3.4:1234");
        assert_eq!(config.send_concurrency, 123);
        assert_eq!(config.queue_capacity, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let yaml = r#"
endpoint: "http://collector:4317"
"#;
        let config: ExportClientConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.send_concurrency, default_send_concurrency());
        assert_eq!(config.effective_queue_capacity(), default_send_concurrency());
    }
}
