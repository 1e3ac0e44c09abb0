//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::insights::{InsightsConfig, LocalDay, MAX_TREND_WINDOW_DAYS};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub insights: InsightsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("moodmeal").join("moodmeal.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./moodmeal_data/moodmeal.db".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub fn default_directive(&self) -> String {
        format!("moodmeal={},tower_http={}", self.level, self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("moodmeal").join("config.toml")),
            Some(PathBuf::from("/etc/moodmeal/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if LocalDay::from_offset_minutes(self.insights.streak_utc_offset_minutes).is_none() {
            return Err(ConfigError::Invalid(format!(
                "insights.streak_utc_offset_minutes must be within ±1439, got {}",
                self.insights.streak_utc_offset_minutes
            )));
        }
        if !(0..=MAX_TREND_WINDOW_DAYS).contains(&self.insights.trend_window_days) {
            return Err(ConfigError::Invalid(format!(
                "insights.trend_window_days must be within 0..={}, got {}",
                MAX_TREND_WINDOW_DAYS, self.insights.trend_window_days
            )));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(db_path) = std::env::var("MOODMEAL_DB_PATH") {
            self.storage.db_path = db_path;
        }

        if let Ok(host) = std::env::var("MOODMEAL_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("MOODMEAL_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(offset) = std::env::var("MOODMEAL_STREAK_UTC_OFFSET_MINUTES") {
            if let Ok(minutes) = offset.parse() {
                self.insights.streak_utc_offset_minutes = minutes;
            }
        }

        if let Ok(level) = std::env::var("MOODMEAL_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MOODMEAL_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# MoodMeal Configuration
#
# Environment variables override these settings:
# - MOODMEAL_DB_PATH
# - MOODMEAL_API_HOST
# - MOODMEAL_API_PORT
# - MOODMEAL_STREAK_UTC_OFFSET_MINUTES
# - MOODMEAL_LOG_LEVEL
# - MOODMEAL_LOG_FORMAT

[storage]
# SQLite database holding meals, mood logs and craving swaps
db_path = "./moodmeal_data/moodmeal.db"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 3000

[insights]
# Lookback of the weekly mood trend (days)
trend_window_days = 7

# Length of the top mood-boosting foods list
top_foods_limit = 10

# A food must be logged this many times (with pre and post mood) to be ranked
min_food_occurrences = 2

# Distinct foods needed for a balanced day
balanced_min_foods = 3

# Minutes east of UTC that define "a day" for streaks (e.g. -300 for UTC-5)
streak_utc_offset_minutes = 0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
