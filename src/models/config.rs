//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Signs session cookies and verifies bearer tokens.
    pub secret: String,
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}
