//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; the bot token is read from the
//! `TELEGRAM_BOT_TOKEN` environment variable and never from the file.
//!
//! # Example
//!
//! ```no_run
//! use stockwatch::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::checker::{CheckerConfig, MAX_INTERVAL_MINUTES};
use super::logging::LoggingConfig;
use super::source::SourceConfig;
use super::telegram::{DeliveryMode, TelegramAppConfig};
use super::web::WebConfig;
use crate::error::{ConfigError, Result};

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

/// Path value that selects the in-memory store.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`]. Every section is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to SQLite database file, or `:memory:` for a throwaway store.
    #[serde(default = "default_database_path")]
    pub database: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Check cycle timing.
    #[serde(default)]
    pub checker: CheckerConfig,

    /// Shop host rules and page fetching.
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub telegram: TelegramAppConfig,

    /// Web dashboard.
    #[serde(default)]
    pub web: WebConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            checker: CheckerConfig::default(),
            source: SourceConfig::default(),
            telegram: TelegramAppConfig::default(),
            web: WebConfig::default(),
        }
    }
}

fn default_database_path() -> String {
    "stockwatch.db".to_string()
}

impl Config {
    /// Parse configuration from TOML content, reading the bot token from
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let token = std::env::var(TELEGRAM_TOKEN_VAR).ok();
        Self::parse_toml_with_token(content, token)
    }

    /// Parse configuration from TOML content with an explicit bot token.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml_with_token(content: &str, bot_token: Option<String>) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.telegram.bot_token = bot_token.filter(|t| !t.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Initialize tracing from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// True when `database` selects the in-memory store.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.database == IN_MEMORY_DATABASE
    }

    /// Re-check invariants after command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.checker.interval_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "checker.interval_minutes",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.checker.interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "checker.interval_minutes",
                reason: format!("must be at most {MAX_INTERVAL_MINUTES} (one week)"),
            }
            .into());
        }
        if self.checker.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "checker.request_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.checker.check_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "checker.check_timeout_secs",
                reason: "must be greater than 0 when set".to_string(),
            }
            .into());
        }
        if self.source.allowed_host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source.allowed_host",
            }
            .into());
        }
        if !self.source.product_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "source.product_path",
                reason: "must start with '/'".to_string(),
            }
            .into());
        }
        if self.source.pincode.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "source.pincode",
            }
            .into());
        }
        if self.telegram.enabled {
            if self.telegram.bot_token.is_none() {
                return Err(ConfigError::MissingField {
                    field: TELEGRAM_TOKEN_VAR,
                }
                .into());
            }
            if self.telegram.delivery == DeliveryMode::Channel && self.telegram.channel_id.is_none()
            {
                return Err(ConfigError::MissingField {
                    field: "telegram.channel_id",
                }
                .into());
            }
        }
        if self.web.enabled {
            self.web.bind_addr()?;
        }
        Ok(())
    }
}
