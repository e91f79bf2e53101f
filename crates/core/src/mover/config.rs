//! Mover configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the bulk move executor.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoverConfig {
    /// How many memberships to copy per write batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Artificial delay per copied company (milliseconds), modelling the
    /// slow membership writes of the production dataset. Set to 0 for
    /// instant moves.
    #[serde(default = "default_insert_throttle")]
    pub insert_throttle_ms: u64,
}

fn default_batch_size() -> usize {
    100
}

fn default_insert_throttle() -> u64 {
    100
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            insert_throttle_ms: default_insert_throttle(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MoverConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.insert_throttle_ms, 100);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            insert_throttle_ms = 0
        "#;
        let config: MoverConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.insert_throttle_ms, 0);
    }
}
