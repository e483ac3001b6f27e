/// Configuration management for Todo Service
///
/// Settings are read from `APP_`-prefixed environment variables, optionally seeded
/// from a `.env` file.
use resilience::RetryConfig;
use serde::Deserialize;
use std::time::Duration;

use crate::services::IdClientConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to (`APP_LISTEN_HOST_PORT`)
    #[serde(default = "default_listen_host_port")]
    pub listen_host_port: String,
    /// Address of the identifier service (`APP_ID_HOST_PORT`)
    #[serde(default = "default_id_host_port")]
    pub id_host_port: String,
    /// Per-attempt deadline for identifier requests (`APP_ID_TIMEOUT_MS`)
    #[serde(default = "default_id_timeout_ms")]
    pub id_timeout_ms: u64,
    /// Extra attempts after a transient identifier failure (`APP_ID_MAX_RETRIES`)
    #[serde(default)]
    pub id_max_retries: u32,
    /// PostgreSQL URL; in-memory storage when unset (`APP_DATABASE_URL`)
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_listen_host_port() -> String {
    "localhost:8080".to_string()
}

fn default_id_host_port() -> String {
    "localhost:8081".to_string()
}

fn default_id_timeout_ms() -> u64 {
    5_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host_port: default_listen_host_port(),
            id_host_port: default_id_host_port(),
            id_timeout_ms: default_id_timeout_ms(),
            id_max_retries: 0,
            database_url: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed("APP_").from_env()
    }

    /// Database URL, ignoring a blank value
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Base URL of the identifier service
    pub fn id_service_url(&self) -> String {
        if self.id_host_port.starts_with("http://") || self.id_host_port.starts_with("https://") {
            self.id_host_port.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", self.id_host_port)
        }
    }

    pub fn id_client_config(&self) -> IdClientConfig {
        IdClientConfig {
            base_url: self.id_service_url(),
            timeout: Duration::from_millis(self.id_timeout_ms),
            retry: RetryConfig::with_max_retries(self.id_max_retries),
        }
    }
}
