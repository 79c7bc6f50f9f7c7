//! Mock server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Login whose demo field, drone and mission are created at startup
    pub seed_user: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("FIELDOPS_MOCK_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            seed_user: env::var("FIELDOPS_MOCK_SEED_USER")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        }
    }
}
