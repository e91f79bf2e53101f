use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::mover::MoverConfig;
use crate::transfer::TransferConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub mover: MoverConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
    /// Remote collection service the client side talks to.
    /// Optional: the server binary does not need it.
    #[serde(default)]
    pub collection_service: Option<CollectionServiceConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("corral.db")
}

/// First-start seeding configuration.
///
/// On an empty database the server creates `companies` company records, a
/// source collection holding all of them and an empty liked collection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedConfig {
    #[serde(default = "default_seed_companies")]
    pub companies: usize,
    #[serde(default = "default_source_collection")]
    pub source_collection: String,
    #[serde(default = "default_liked_collection")]
    pub liked_collection: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            companies: default_seed_companies(),
            source_collection: default_source_collection(),
            liked_collection: default_liked_collection(),
        }
    }
}

fn default_seed_companies() -> usize {
    50_000
}

fn default_source_collection() -> String {
    "My List".to_string()
}

fn default_liked_collection() -> String {
    "Liked Companies List".to_string()
}

/// Remote collection service configuration (client side).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionServiceConfig {
    /// Service URL (e.g., "http://localhost:8000")
    pub url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.path, PathBuf::from("corral.db"));
        assert_eq!(config.seed.companies, 50_000);
        assert_eq!(config.seed.source_collection, "My List");
        assert_eq!(config.seed.liked_collection, "Liked Companies List");
        assert!(config.collection_service.is_none());
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert_eq!(config.cors_origins, vec!["http://localhost:5173"]);
    }

    #[test]
    fn test_collection_service_timeout_default() {
        let toml = r#"
            url = "http://localhost:8000"
        "#;
        let config: CollectionServiceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 30);
    }
}
