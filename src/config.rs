use bluer::Address;
use log::{debug, info};
use std::env;
use url::Url;

use crate::error::ConfigError;

const DEFAULT_LOCATION: &str = "basement";
const DEFAULT_INFLUXDB_URL: &str = "http://localhost:8086";

#[derive(Debug, Clone, PartialEq)]
pub struct WavePlusConfig {
    pub device_address: Address,
    pub location: String,
    pub influxdb_url: Url,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub write_timestamp: bool,
}

impl WavePlusConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat blank values as unset
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mac = get("WAVEPLUS_MAC").ok_or(ConfigError::Missing("WAVEPLUS_MAC"))?;
        let device_address: Address = mac.parse().map_err(|_| ConfigError::Invalid {
            key: "WAVEPLUS_MAC",
            reason: format!("'{}' is not a Bluetooth address", mac),
        })?;

        let location = get("WAVEPLUS_LOCATION").unwrap_or_else(|| DEFAULT_LOCATION.to_string());
        // A control character would break the single-line point
        if location.chars().any(char::is_control) {
            return Err(ConfigError::Invalid {
                key: "WAVEPLUS_LOCATION",
                reason: "must not contain control characters".to_string(),
            });
        }

        let raw_url = get("INFLUXDB_URL").unwrap_or_else(|| DEFAULT_INFLUXDB_URL.to_string());
        let influxdb_url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            key: "INFLUXDB_URL",
            reason: e.to_string(),
        })?;
        if influxdb_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "INFLUXDB_URL",
                reason: format!("'{}' cannot be used as a base url", raw_url),
            });
        }

        let database = get("INFLUXDB_DB").ok_or(ConfigError::Missing("INFLUXDB_DB"))?;

        let write_timestamp = match get("INFLUXDB_WRITE_TIMESTAMP") {
            None => false,
            Some(v) => parse_bool(&v).ok_or_else(|| ConfigError::Invalid {
                key: "INFLUXDB_WRITE_TIMESTAMP",
                reason: format!("'{}' is not a boolean", v),
            })?,
        };

        let config = WavePlusConfig {
            device_address,
            location,
            influxdb_url,
            database,
            username: get("INFLUXDB_USER"),
            password: get("INFLUXDB_PASSWORD"),
            write_timestamp,
        };

        info!(
            "Wave Plus {} at '{}' -> {} (database '{}')",
            config.device_address, config.location, config.influxdb_url, config.database
        );
        debug!(
            "Credentials configured: {}, write timestamp: {}",
            config.username.is_some(),
            config.write_timestamp
        );

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
