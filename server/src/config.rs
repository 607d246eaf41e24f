//! Server configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::simulate::Delays;

pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub delays: Delays,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
            delays: Delays::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to
    /// defaults for every missing key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(host) = lookup("ITEMS_HOST") {
            config.host = host.parse().map_err(|e| ConfigError::Invalid {
                key: "ITEMS_HOST",
                reason: format!("{e}"),
            })?;
        }

        if let Some(port) = lookup("PORT") {
            config.port = port.parse().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: format!("{e}"),
            })?;
        }

        if let Some(origins) = lookup("ITEMS_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(ms) = lookup("ITEMS_MAX_LATENCY_MS") {
            config.delays.max_latency = parse_millis("ITEMS_MAX_LATENCY_MS", &ms)?;
        }

        if let Some(ms) = lookup("ITEMS_TIMEOUT_DELAY_MS") {
            config.delays.timeout = parse_millis("ITEMS_TIMEOUT_DELAY_MS", &ms)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for origin in &self.cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                key: "ITEMS_CORS_ORIGINS",
                reason: format!("{origin:?}: {e}"),
            })?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("{value:?}: {e}"),
        })
}
