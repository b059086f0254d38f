//! Configuration management for the treeacl service.
//!
//! This module provides configuration loading with multiple sources:
//! 1. Default values (hardcoded)
//! 2. Configuration file (YAML)
//! 3. Environment variables (override)
//!
//! # Configuration Hierarchy
//!
//! Environment variables take precedence over config file values,
//! which take precedence over defaults.
//!
//! # Example
//!
//! ```ignore
//! use treeacl_server::config::ServerConfig;
//!
//! // Load from file with env overrides
//! let config = ServerConfig::load("treeacl.yaml")?;
//!
//! // Or load from environment only
//! let config = ServerConfig::from_env()?;
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use treeacl_domain::resolver::{MalformedEntryPolicy, ResolverConfig};

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,

    /// ACL resolution settings
    #[serde(default)]
    pub acl: AclSettings,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON format (true for production, false for development)
    #[serde(default)]
    pub json: bool,

    /// Log span enter/exit events (resolution runs, root line lookups)
    #[serde(default)]
    pub spans: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            spans: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// ACL resolution settings.
///
/// Environment variables use the `TREEACL_` prefix and `__` as the
/// nested key separator:
///
/// - `TREEACL_ACL__ENABLE_FILTER_SELECTOR=true`
/// - `TREEACL_ACL__MAX_DEPTH=250`
/// - `TREEACL_ACL__TIMEOUT_SECS=5`
/// - `TREEACL_ACL__MALFORMED_ENTRIES=abort`
///
/// # Example YAML Configuration
///
/// ```yaml
/// acl:
///   enable_filter_selector: true
///   max_depth: 100
///   timeout_secs: 30
///   malformed_entries: skip
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AclSettings {
    /// Show only the selected principals in the overview.
    #[serde(default)]
    pub enable_filter_selector: bool,

    /// Maximum node depth below the resolved page.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Timeout for one resolution run in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Handling of ACL rows with an unknown principal type: "skip" or "abort".
    #[serde(default = "default_malformed_entries")]
    pub malformed_entries: String,
}

impl Default for AclSettings {
    fn default() -> Self {
        Self {
            enable_filter_selector: false,
            max_depth: default_max_depth(),
            timeout_secs: default_timeout_secs(),
            malformed_entries: default_malformed_entries(),
        }
    }
}

fn default_max_depth() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_malformed_entries() -> String {
    "skip".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ServerConfig {
    /// Load configuration from a YAML file with environment variable overrides.
    ///
    /// Environment variables are prefixed with `TREEACL_` and use `__` as
    /// separator, e.g. `TREEACL_LOGGING__LEVEL=debug` overrides `logging.level`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Load configuration from environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ServerConfig::default())?)
            .add_source(env_source())
            .build()?;

        let server_config: ServerConfig = config.try_deserialize()?;
        server_config.validate()?;

        Ok(server_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.acl.max_depth == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "acl.max_depth must be greater than 0".to_string(),
            });
        }

        if self.acl.timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "acl.timeout_secs must be greater than 0".to_string(),
            });
        }

        if MalformedEntryPolicy::parse(&self.acl.malformed_entries).is_none() {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "acl.malformed_entries must be one of: [\"skip\", \"abort\"], got: {}",
                    self.acl.malformed_entries
                ),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// Resolver settings derived from the `acl` section.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::default()
            .with_max_depth(self.acl.max_depth)
            .with_timeout(Duration::from_secs(self.acl.timeout_secs))
            .with_malformed_entries(
                MalformedEntryPolicy::parse(&self.acl.malformed_entries).unwrap_or_default(),
            )
    }
}

// TREEACL_ACL__MAX_DEPTH -> acl.max_depth
fn env_source() -> Environment {
    Environment::with_prefix("TREEACL")
        .prefix_separator("_")
        .separator("__")
}
