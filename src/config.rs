//! Process settings and tariff loading.
//!
//! Settings come from the environment (a `.env` file is honoured). The tariff
//! is read once at startup; the engine only ever sees the validated value.

use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::pricing::PricingConfig;
use crate::routing::google::DEFAULT_BASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: &'static str, value: String },

    #[error("failed to read pricing config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pricing config {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("pricing config {} is invalid: {}", .path.display(), .errors.join("; "))]
    Invalid { path: PathBuf, errors: Vec<String> },
}

/// Process-level settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub pricing_config_path: PathBuf,
    pub google_maps_api_key: Option<String>,
    pub directions_base_url: String,
    pub routing_timeout: Duration,
    pub route_cache_ttl: Duration,
    pub route_cache_capacity: u64,
    pub depot_address: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            pricing_config_path: PathBuf::from("config/pricing.json"),
            google_maps_api_key: None,
            directions_base_url: DEFAULT_BASE_URL.to_string(),
            routing_timeout: Duration::from_secs(10),
            route_cache_ttl: Duration::from_secs(60 * 60),
            route_cache_capacity: 1000,
            depot_address: None,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read settings through an arbitrary lookup; unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", get("PORT"))?.unwrap_or(defaults.port),
            pricing_config_path: get("PRICING_CONFIG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.pricing_config_path),
            google_maps_api_key: get("GOOGLE_MAPS_API_KEY"),
            directions_base_url: get("DIRECTIONS_BASE_URL").unwrap_or(defaults.directions_base_url),
            routing_timeout: parse_var("ROUTING_TIMEOUT_SECS", get("ROUTING_TIMEOUT_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.routing_timeout),
            route_cache_ttl: parse_var("ROUTE_CACHE_TTL_SECS", get("ROUTE_CACHE_TTL_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(defaults.route_cache_ttl),
            route_cache_capacity: parse_var("ROUTE_CACHE_CAPACITY", get("ROUTE_CACHE_CAPACITY"))?
                .unwrap_or(defaults.route_cache_capacity),
            depot_address: get("DEPOT_ADDRESS"),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidVar {
                name: "HOST",
                value: self.host.clone(),
            })
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value
        .map(|v| v.parse::<T>().map_err(|_| ConfigError::InvalidVar { name, value: v }))
        .transpose()
}

/// Load and validate the tariff.
///
/// A missing file falls back to the built-in tariff with a warning. A file
/// that exists but cannot be read, parsed or validated is an error.
pub fn load_pricing_config(path: &Path) -> Result<PricingConfig, ConfigError> {
    let config = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str::<PricingConfig>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                "Pricing config {} not found, using built-in tariff",
                path.display()
            );
            PricingConfig::default()
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Invalid {
            path: path.to_path_buf(),
            errors,
        });
    }

    tracing::info!(
        "Loaded pricing config: {} trailers, {} load grades, {} flat tiers",
        config.trailers.len(),
        config.load_grades.len(),
        config.one_pallet.tiers.len()
    );

    Ok(config)
}
