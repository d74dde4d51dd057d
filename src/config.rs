//! Configuration management for the check-in server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, time::Duration};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL of the hosted visitor database. Empty means "not configured".
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

/// Timings of the client-side scan session
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScannerConfig {
    /// Debounce window started when a capture begins processing
    pub cooldown_ms: u64,
    /// Watchdog for a single resolution
    pub processing_timeout_ms: u64,
    /// Automatic re-arms before a terminal error is shown
    pub auto_retry_limit: u32,
    pub auto_retry_delay_ms: u64,
}

/// Bounded retry policy for store writes
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RegistryConfig {
    pub recent_per_category: i64,
    pub recent_total: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub scanner: ScannerConfig,
    pub retry: RetryConfig,
    pub registry: RegistryConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix CHECKIN_)
            .add_source(
                Environment::with_prefix("CHECKIN")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override database URL from DATABASE_URL env var if present
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl ScannerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn processing_timeout(&self) -> Duration {
        Duration::from_millis(self.processing_timeout_ms)
    }

    pub fn auto_retry_delay(&self) -> Duration {
        Duration::from_millis(self.auto_retry_delay_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 1_000,
            processing_timeout_ms: 10_000,
            auto_retry_limit: 2,
            auto_retry_delay_ms: 2_000,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            recent_per_category: 20,
            recent_total: 50,
        }
    }
}
