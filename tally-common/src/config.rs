//! Configuration loading and root folder resolution
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The binary handles tiers 1 and 2 through clap; this module supplies the
//! TOML and compiled-default tiers and merges them. A missing or unreadable
//! config file never stops startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// File name of the store inside the root folder
pub const DATABASE_FILE_NAME: &str = "tally.db";

/// Directory name used under the platform config dir and `/etc`
pub const CONFIG_DIR_NAME: &str = "tally-desk";

/// Logging section of the TOML file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set (e.g. "info", "debug")
    pub level: Option<String>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub require_timestamp: Option<bool>,
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load the config file, falling back to an empty config.
    ///
    /// `explicit` is a path given on the command line or in the
    /// environment; otherwise the platform locations are searched. The
    /// second element is a warning to log once logging is up, set when a
    /// file was found but could not be read or parsed.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, Option<String>) {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_file(),
        };

        let Some(path) = path else {
            return (Self::default(), None);
        };

        match Self::load(&path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("Ignoring config file {}: {}", path.display(), e)),
            ),
        }
    }
}

/// Compiled defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub require_timestamp: bool,
    pub max_connections: u32,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            // Deployment-relative: the store sits next to the running service
            root_folder: PathBuf::from("."),
            host: "0.0.0.0".to_string(),
            port: 3000,
            require_timestamp: false,
            max_connections: 5,
            log_level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub require_timestamp: Option<bool>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub require_timestamp: bool,
    pub max_connections: u32,
    pub log_level: String,
}

impl Config {
    /// Merge overrides, file values and compiled defaults
    pub fn resolve(overrides: Overrides, file: TomlConfig) -> Self {
        let defaults = CompiledDefaults::default();

        Self {
            root_folder: overrides
                .root_folder
                .or(file.root_folder)
                .unwrap_or(defaults.root_folder),
            host: overrides.host.or(file.host).unwrap_or(defaults.host),
            port: overrides.port.or(file.port).unwrap_or(defaults.port),
            require_timestamp: overrides
                .require_timestamp
                .or(file.require_timestamp)
                .unwrap_or(defaults.require_timestamp),
            max_connections: file.max_connections.unwrap_or(defaults.max_connections),
            log_level: file.logging.level.unwrap_or(defaults.log_level),
        }
    }

    /// Path of the store file
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    /// `host:port` listen address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// First existing config file among the platform locations
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc").join(CONFIG_DIR_NAME).join("config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
