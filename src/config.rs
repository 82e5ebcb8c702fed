//! Configuration management for Tasksync Server

use std::env;

use thiserror::Error;

use crate::tasks::StorePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub sync: StorePolicy,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            sync: StorePolicy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = StorePolicy::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: port_from_env()?,
            },
            sync: StorePolicy {
                require_version: flag("SYNC_REQUIRE_VERSION", defaults.require_version)?,
                allow_client_id: flag("SYNC_ALLOW_CLIENT_ID", defaults.allow_client_id)?,
                reject_duplicate_ids: flag(
                    "SYNC_REJECT_DUPLICATE_IDS",
                    defaults.reject_duplicate_ids,
                )?,
            },
        })
    }
}

fn port_from_env() -> Result<u16, ConfigError> {
    let (var, value) = match env::var("SERVER_PORT") {
        Ok(value) => ("SERVER_PORT", value),
        Err(_) => match env::var("PORT") {
            Ok(value) => ("PORT", value),
            Err(_) => return Ok(3000),
        },
    };

    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { var, value })
}

fn flag(var: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(var) {
        Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
