//! Server configuration loaded from the environment.

use std::env;

/// Runtime configuration for the HTTP server.
///
/// Every field has a development-friendly default; deployments override via
/// environment variables (`HOST`, `PORT`, `CORS_ORIGINS`,
/// `REQUEST_TIMEOUT_SECS`, `SHUTDOWN_TIMEOUT_SECS`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins, comma separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_or("PORT", "3000")
                .parse()
                .expect("PORT must be a valid port number"),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", "30")
                .parse()
                .expect("REQUEST_TIMEOUT_SECS must be an integer"),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", "30")
                .parse()
                .expect("SHUTDOWN_TIMEOUT_SECS must be an integer"),
        }
    }
}
