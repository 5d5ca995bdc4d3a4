//! Application settings loaded from config.toml
//!
//! Every field has a default, so the file itself is optional. `DATABASE_URL` and
//! `BIND_ADDRESS` from the environment (or `.env`) override the file.

use crate::config::database::{DEFAULT_DATABASE_URL, get_database_url};
use crate::core::date_layout::{DEFAULT_DATE_TIME_LAYOUT, DateLayout};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default listen address for the HTTP server.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage settings
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Wire format settings
    #[serde(default)]
    pub format: FormatConfig,
}

/// `[server]` section
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to, e.g. `0.0.0.0:8080`
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// `[database]` section
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// SeaORM connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

/// `[format]` section
#[derive(Debug, Deserialize)]
pub struct FormatConfig {
    /// chrono strftime layout used for `changeDate` on the wire
    #[serde(default = "default_date_time_layout")]
    pub date_time_layout: String,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}

fn default_date_time_layout() -> String {
    DEFAULT_DATE_TIME_LAYOUT.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            date_time_layout: default_date_time_layout(),
        }
    }
}

impl AppConfig {
    /// Builds the validated wire date layout from `[format]`.
    pub fn date_layout(&self) -> Result<DateLayout> {
        DateLayout::new(&self.format.date_time_layout)
    }

    fn apply_env_overrides(&mut self) {
        self.database.url = get_database_url(&self.database.url);
        if let Ok(bind_address) = std::env::var("BIND_ADDRESS") {
            self.server.bind_address = bind_address;
        }
    }
}

/// Parses configuration from a TOML string.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_config(&contents)
}

/// Loads the application configuration used at startup.
///
/// Reads the file named by `STATUS_CONFIG` (default `./config.toml`), falling back to
/// built-in defaults when the file does not exist, then applies environment overrides
/// and validates the date layout.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("STATUS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        info!("No config file at {}, using defaults", path);
        AppConfig::default()
    };
    config.apply_env_overrides();
    config.date_layout()?;

    info!(
        "Configuration loaded: bind_address={}, date_time_layout={}",
        config.server.bind_address, config.format.date_time_layout
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [server]
            bind_address = "127.0.0.1:9000"

            [database]
            url = "sqlite::memory:"

            [format]
            date_time_layout = "%Y-%m-%d %H:%M:%S"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.format.date_time_layout, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[server]\nbind_address = \"127.0.0.1:1\"\n").unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:1");
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.format.date_time_layout, DEFAULT_DATE_TIME_LAYOUT);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_config("[server\nbind_address =");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let config = parse_config("[format]\ndate_time_layout = \"%Y-%Q\"\n").unwrap();
        assert!(matches!(config.date_layout(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("/definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
