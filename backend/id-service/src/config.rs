/// Configuration for the identifier service, read from `APP_ID_*` variables
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to (`APP_ID_LISTEN_HOST_PORT`)
    #[serde(default = "default_listen_host_port")]
    pub listen_host_port: String,
}

fn default_listen_host_port() -> String {
    "localhost:8081".to_string()
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::prefixed("APP_ID_").from_env()
    }
}
