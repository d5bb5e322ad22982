//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SW_ASSETS_*)
//! 2. TOML config file (if SW_ASSETS_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Asset routes are usually declared in the TOML file:
//!
//! ```toml
//! [[routes]]
//! regexp = '\.jpg$'
//! caching_strategy = "CACHE_FIRST"
//! deny_list = ['/private/']
//! max_entries = 50
//! ```

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::routing::{RouteConfig, RoutingRule};
use crate::strategy::ASSET_CACHE_NAME;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SW_ASSETS_*)
/// 2. TOML config file (if SW_ASSETS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via SW_ASSETS_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Cache namespace shared by every route.
    ///
    /// Set via SW_ASSETS_CACHE_NAME environment variable.
    #[serde(default = "default_cache_name")]
    pub cache_name: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via SW_ASSETS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via SW_ASSETS_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SW_ASSETS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Asset caching rules, registered in the order listed.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./sw-assets-cache.sqlite")
}

fn default_cache_name() -> String {
    ASSET_CACHE_NAME.into()
}

fn default_user_agent() -> String {
    "sw-assets/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_name: default_cache_name(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            routes: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SW_ASSETS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        Self::extract(figment.merge(
            Env::prefixed("SW_ASSETS_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        ))
    }

    /// Extract and validate a configuration from an explicit figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadFailed` if extraction fails, or the
    /// validation error otherwise.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Compile every configured route, in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPattern` for the first route whose pattern or
    /// deny-list fails to compile.
    pub fn routing_rules(&self) -> Result<Vec<RoutingRule>, Error> {
        self.routes.iter().map(RouteConfig::compile).collect()
    }

    /// Check that at least one route is configured (for commands that fetch).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no routes are configured.
    pub fn require_routes(&self) -> Result<&[RouteConfig], ConfigError> {
        if self.routes.is_empty() {
            return Err(ConfigError::Missing {
                field: "routes".into(),
                hint: "Add [[routes]] tables to the file named by SW_ASSETS_CONFIG_FILE".into(),
            });
        }
        Ok(&self.routes)
    }
}
