//! Application configuration loaded from environment variables.

/// Client configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `STOREFRONT_API_URL` — backend base URL (default: `"http://localhost:8080"`)
/// - `STOREFRONT_TIMEOUT_SECS` — per-request timeout (default: `10`)
/// - `STOREFRONT_TOKEN` — bearer token from a previous login (optional)
/// - `STOREFRONT_USER_ID` — numeric user id from a previous login (optional)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
    pub token: Option<String>,
    pub user_id: Option<i64>,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("STOREFRONT_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            timeout_secs: std::env::var("STOREFRONT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            token: std::env::var("STOREFRONT_TOKEN").ok(),
            user_id: std::env::var("STOREFRONT_USER_ID")
                .ok()
                .and_then(|v| v.parse().ok()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            timeout_secs: 10,
            token: None,
            user_id: None,
            log_level: "info".to_string(),
        }
    }
}
