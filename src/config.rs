//! # Configuration Management
//!
//! Centralized configuration for the client protocol layer.
//!
//! This module provides structured configuration for the login handshake
//! and logging, loadable from TOML files, TOML strings, or environment
//! variables.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

use crate::error::{ProtocolError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NetConfig {
    /// Login handshake configuration
    #[serde(default)]
    pub login: LoginConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NetConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("GAME_PROTOCOL_SERVER_ADDRESS") {
            config.login.address = addr;
        }

        if let Ok(addr) = std::env::var("GAME_PROTOCOL_DEFAULT_ADDRESS") {
            config.login.default_address = addr;
        }

        if let Ok(flag) = std::env::var("GAME_PROTOCOL_USE_ENCRYPTION") {
            if let Ok(val) = flag.parse::<bool>() {
                config.login.use_encryption = val;
            }
        }

        if let Ok(scene) = std::env::var("GAME_PROTOCOL_POST_LOGIN_SCENE") {
            config.login.post_login_scene = scene;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.login.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Login handshake configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginConfig {
    /// Explicit server address override (e.g., "play.example.net:8080").
    /// When empty, `default_address` is used.
    #[serde(default)]
    pub address: String,

    /// Fallback server address used when no override is supplied
    pub default_address: String,

    /// Whether to reach the login endpoint over an encrypted scheme
    pub use_encryption: bool,

    /// Scene requested from the UI collaborator after a successful login
    pub post_login_scene: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            default_address: String::from("127.0.0.1:8080"),
            use_encryption: false,
            post_login_scene: String::from("Sandbox"),
        }
    }
}

impl LoginConfig {
    /// Validate login configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.address.is_empty() && self.default_address.is_empty() {
            errors.push("Either an address override or a default address must be set".to_string());
        }

        for (label, address) in [("address", &self.address), ("default_address", &self.default_address)] {
            if !address.is_empty() && address.contains("://") {
                errors.push(format!(
                    "{label} must be a bare host[:port], scheme is chosen by use_encryption: '{address}'"
                ));
            }
        }

        if self.post_login_scene.is_empty() {
            errors.push("post_login_scene cannot be empty".to_string());
        }

        if !self.use_encryption {
            errors.push(
                "WARNING: Credentials will travel in plaintext - not recommended for production"
                    .to_string(),
            );
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("game-protocol"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
