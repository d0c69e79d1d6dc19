//! CLI configuration loading and merging.

use anyhow::{Context, Result};
use lpx_data::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,

    /// Data provider settings
    #[serde(default)]
    pub provider: Option<ProviderConfig>,
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        if let Some(ref provider) = config.provider {
            provider
                .validate()
                .with_context(|| format!("Invalid provider configuration in {}", path.display()))?;
        }

        Ok(config)
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map_or_else(|_| PathBuf::from("."), PathBuf::from)
            .join(".lpx")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".lpxrc")
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: Self) {
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.provider.is_some() {
            self.provider = other.provider;
        }
    }

    /// The provider configuration, falling back to defaults.
    pub fn provider_config(&self) -> ProviderConfig {
        self.provider.clone().unwrap_or_default()
    }
}

/// Load and merge CLI configuration.
///
/// Configuration precedence:
/// 1. CLI arguments (handled by clap)
/// 2. Explicit config file (`--config`), which must exist
/// 3. Local config file (./.lpxrc)
/// 4. Global config file (~/.lpx/config.toml)
/// 5. Defaults
///
/// Missing discovered files are skipped; malformed ones are reported.
pub fn load_config(explicit: Option<&Path>) -> Result<CliConfig> {
    let mut config = CliConfig::default();

    for path in [CliConfig::default_global_path(), CliConfig::default_local_path()] {
        if path.exists() {
            config.merge(CliConfig::load_from_file(&path)?);
        }
    }

    if let Some(path) = explicit {
        config.merge(CliConfig::load_from_file(path)?);
    }

    Ok(config)
}
