//! Configuration module for the resolution worker.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `PYRESOLVE_` and use double
//! underscores to separate nested levels:
//! - `PYRESOLVE_DEFAULT_INTERPRETER=/usr/bin/python3` sets `default_interpreter`
//! - `PYRESOLVE_ENVIRONMENT__CACHE=false` sets `environment.cache`
//! - `PYRESOLVE_LOGGING__LEVEL=debug` sets `logging.level`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = ".pyresolve";
const CONFIG_FILE: &str = "settings.toml";
const ENV_PREFIX: &str = "PYRESOLVE_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Interpreter used when a query carries no `pythonExecutable`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_interpreter: Option<PathBuf>,

    /// Analysis environment settings
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Diagnostic output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EnvironmentConfig {
    /// Keep discovered environments for the lifetime of the process
    #[serde(default = "default_true")]
    pub cache: bool,

    /// Directories appended to every environment's module search path
    #[serde(default)]
    pub extra_paths: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `PYRESOLVE_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            debug: false,
            default_interpreter: None,
            environment: EnvironmentConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            cache: true,
            extra_paths: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref(), ENV_PREFIX)
            .extract()
            .map_err(Box::new)
    }

    fn figment(path: &Path, env_prefix: &str) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(path))
            // Double underscore separates nested levels; single underscores
            // stay part of the field name
            .merge(Env::prefixed(env_prefix).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
    }

    /// Find `.pyresolve/settings.toml` from the current directory up to root
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(CONFIG_FILE));
            }
        }

        None
    }

    /// Effective filter directive for the log subscriber
    pub fn log_filter(&self) -> &str {
        if self.debug { "debug" } else { &self.logging.level }
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file with helpful comments
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = r#"# pyresolve configuration file

# Version of the configuration schema
version = 1

# Log at debug level regardless of [logging]
debug = false

# Interpreter used for queries that carry no "pythonExecutable".
# When unset, the first python3/python on PATH is used.
# default_interpreter = "/usr/bin/python3"

[environment]
# Reuse discovered interpreter environments across queries
cache = true

# Directories appended to every environment's module search path
extra_paths = []

[logging]
# Filter directive for stderr diagnostics; PYRESOLVE_LOG takes precedence
level = "warn"
"#;

        std::fs::write(&config_path, template)?;
        Ok(config_path)
    }
}
