//! Configuration management for pkgalter

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::layout::DEFAULT_WIDTH;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Behaviour of the alteration commands
    #[serde(default)]
    pub main: MainConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite state database
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/lib/pkgalter/state.sqlite"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainConfig {
    /// Answer yes to confirmation prompts
    #[serde(default)]
    pub assume_yes: bool,

    /// Destination for download-only runs
    #[serde(default)]
    pub download_dir: Option<PathBuf>,

    /// Line width used when stdout is not a terminal
    #[serde(default = "default_width")]
    pub terminal_width: usize,
}

fn default_width() -> usize {
    DEFAULT_WIDTH
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            assume_yes: false,
            download_dir: None,
            terminal_width: default_width(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(PathBuf::from)
            .or_else(|| {
                // Try system config
                let system_config = PathBuf::from("/etc/pkgalter/pkgalter.conf");
                if system_config.exists() {
                    return Some(system_config);
                }

                // Try user config
                directories::ProjectDirs::from("org", "pkgalter", "pkgalter")
                    .map(|d| d.config_dir().join("pkgalter.conf"))
                    .filter(|p| p.exists())
            });

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                Self::parse(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))
            }
            None => Ok(Config::default()),
        }
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.main.terminal_width == 0 {
            anyhow::bail!("main.terminal_width must be positive");
        }
        Ok(config)
    }
}
