use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ImportError, Result};

/// Application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
    pub format: String, // "json" or "text"
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Nicknames treated as the local user; empty means ask interactively
    #[serde(default)]
    pub self_nicknames: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                format: "text".to_string(),
            },
            database: DatabaseConfig {
                busy_timeout_secs: 5,
            },
            import: ImportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .add_source(Config::try_from(&Self::default())?)
            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(File::with_name("pidgin-to-gajim").required(false))
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix("PIDGIN_TO_GAJIM")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("import.self_nicknames")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;

        // Validate configuration
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ImportError::InvalidConfig(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level, valid_levels
            )));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ImportError::InvalidConfig(format!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format, valid_formats
            )));
        }

        if self.database.busy_timeout_secs == 0 {
            return Err(ImportError::InvalidConfig(
                "busy_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.import.self_nicknames.iter().any(|nick| nick.trim().is_empty()) {
            return Err(ImportError::InvalidConfig(
                "self_nicknames must not contain empty entries".to_string(),
            ));
        }

        Ok(())
    }

    /// Busy timeout for the destination database
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.database.busy_timeout_secs)
    }

    /// Get log level from environment or config
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
