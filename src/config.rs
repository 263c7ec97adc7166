//! Configuration handling for extcrypt plugins
//!
//! Tunables live in a TOML file: either the path given with `--config`
//! (or `EXTCRYPT_CONFIG`), or `config.toml` in the user config directory.
//! Missing sections fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Argon2id parameters for the passphrase key provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassphraseConfig {
    /// Memory cost in KiB (default 64 MiB)
    pub memory_cost: u32,

    /// Number of passes
    pub iterations: u32,

    /// Degree of parallelism
    pub parallelism: u32,

    /// Derived key length in bytes
    pub key_length: usize,

    /// Random salt length in bytes
    pub salt_length: usize,
}

impl Default for PassphraseConfig {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            iterations: 3,
            parallelism: 1,
            key_length: 32,
            salt_length: 16,
        }
    }
}

/// Upper bounds, so parameters read back from metadata cannot exhaust the host
pub const MAX_MEMORY_COST: u32 = 1024 * 1024;
pub const MAX_ITERATIONS: u32 = 64;
pub const MAX_PARALLELISM: u32 = 64;
pub const MAX_KEY_LENGTH: usize = 1024;

impl PassphraseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_length == 0 {
            return Err(ConfigError::Invalid(
                "the key length must be larger than zero".to_string(),
            ));
        }
        if self.salt_length < 8 {
            return Err(ConfigError::Invalid(
                "the salt length must be at least 8 bytes".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(ConfigError::Invalid(
                "the number of iterations must be larger than zero".to_string(),
            ));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::Invalid(
                "parallelism must be larger than zero".to_string(),
            ));
        }
        if self.key_length > MAX_KEY_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "the key length must be at most {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::Invalid(format!(
                "the number of iterations must be at most {}",
                MAX_ITERATIONS
            )));
        }
        if self.parallelism > MAX_PARALLELISM {
            return Err(ConfigError::Invalid(format!(
                "parallelism must be at most {}",
                MAX_PARALLELISM
            )));
        }
        if self.memory_cost > MAX_MEMORY_COST {
            return Err(ConfigError::Invalid(format!(
                "memory cost must be at most {} KiB",
                MAX_MEMORY_COST
            )));
        }

        let floor = self.parallelism.checked_mul(8).ok_or_else(|| {
            ConfigError::Invalid(format!("parallelism {} is out of range", self.parallelism))
        })?;
        if self.memory_cost < floor {
            return Err(ConfigError::Invalid(format!(
                "memory cost must be at least {} KiB for parallelism {}",
                floor, self.parallelism
            )));
        }
        Ok(())
    }
}

/// Settings for the XOR method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XorConfig {
    /// Refuse to run without --encrypt or --decrypt
    pub require_direction: bool,
}

/// Combined plugin configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub passphrase: PassphraseConfig,
    pub xor: XorConfig,
}

impl Config {
    /// Loads from an explicit path, or from the user config directory
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Returns `<config dir>/config.toml` for the current user
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "extcrypt", "extcrypt")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load config: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.passphrase.validate()?;
        Ok(config)
    }
}
