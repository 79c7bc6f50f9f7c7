//! Service endpoints from environment.

use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub fields_url: String,
    pub drones_url: String,
    pub missions_url: String,
    pub planner_url: String,
    /// Login recorded as author of created records
    pub user: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            fields_url: env::var("FIELDOPS_FIELDS_URL")
                .unwrap_or_else(|_| "http://localhost:8080/v1/fields".to_string()),
            drones_url: env::var("FIELDOPS_DRONES_URL")
                .unwrap_or_else(|_| "http://localhost:8081/v1/drones".to_string()),
            missions_url: env::var("FIELDOPS_MISSIONS_URL")
                .unwrap_or_else(|_| "http://localhost:8082/v1/missions".to_string()),
            planner_url: env::var("FIELDOPS_PLANNER_URL")
                .unwrap_or_else(|_| "http://localhost:8082/v1/planner".to_string()),
            user: env::var("FIELDOPS_USER").unwrap_or_else(|_| "tgromov".to_string()),
            timeout: Duration::from_secs(
                env::var("FIELDOPS_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        }
    }

    /// All four services behind one host, as served by the mock backend.
    pub fn single_host(base_url: &str, user: impl Into<String>) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            fields_url: format!("{base}/v1/fields"),
            drones_url: format!("{base}/v1/drones"),
            missions_url: format!("{base}/v1/missions"),
            planner_url: format!("{base}/v1/planner"),
            user: user.into(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_host_strips_trailing_slash() {
        let config = Config::single_host("http://127.0.0.1:9000/", "alice");
        assert_eq!(config.fields_url, "http://127.0.0.1:9000/v1/fields");
        assert_eq!(config.planner_url, "http://127.0.0.1:9000/v1/planner");
        assert_eq!(config.user, "alice");
    }
}
