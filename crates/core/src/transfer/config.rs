//! Transfer coordinator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for bulk transfer tracking.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransferConfig {
    /// Delay between job status queries (milliseconds). The cadence is
    /// constant: no backoff, no jitter.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// How many status queries to issue before giving up on a job that never
    /// reaches a terminal state. With the default cadence this bounds the
    /// wait to roughly five minutes. The job may still be running server-side
    /// after the budget is spent; the client's view simply goes stale.
    #[serde(default = "default_max_attempts")]
    pub max_poll_attempts: u32,
}

fn default_poll_interval() -> u64 {
    1000 // 1 second
}

fn default_max_attempts() -> u32 {
    300
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_attempts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransferConfig::default();
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.max_poll_attempts, 300);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            poll_interval_ms = 250
        "#;
        let config: TransferConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.max_poll_attempts, 300);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            poll_interval_ms = 100
            max_poll_attempts = 10
        "#;
        let config: TransferConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.max_poll_attempts, 10);
    }
}
