//! Configuration management for Areatrack
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{AREA_CODE_MAX_LEN, AREA_CODE_MIN_LEN, CONFIG_GENERATED, MAX_DB_CONNECTIONS};
use crate::utils::datetime;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
    pub seed: SeedConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,
    /// Size of the connection pool
    pub max_connections: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to a file in the user's data directory
    pub enabled: bool,
    /// Minimum level: "off", "error", "warn", "info", "debug" or "trace"
    pub level: String,
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Emit the "N subtask(s) overdue" notice when building a dashboard
    pub overdue_warning: bool,
}

/// Areas created by the `seed` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SeedConfig {
    pub areas: Vec<SeedArea>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeedArea {
    pub name: String,
    /// Code handed to support staff for self-registration
    pub code: String,
}

impl SeedArea {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://areatrack.db?mode=rwc".to_string(),
            max_connections: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { overdue_warning: true }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            areas: vec![
                SeedArea::new("Jurídica", "JUR01"),
                SeedArea::new("Proyectos", "PRO02"),
                SeedArea::new("Redes", "RED03"),
                SeedArea::new("Sistemas", "SIS04"),
                SeedArea::new("Soporte Técnico", "SOP05"),
                SeedArea::new("Comunicaciones", "COM06"),
                SeedArea::new("Planificación", "PLA07"),
                SeedArea::new("Talento Humano", "TAL08"),
                SeedArea::new("Administración", "ADM09"),
            ],
        }
    }
}

impl LoggingConfig {
    /// Parsed log level. Call after [`Config::validate`].
    pub fn level_filter(&self) -> log::LevelFilter {
        log::LevelFilter::from_str(&self.level).unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("areatrack.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("areatrack").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url cannot be empty");
        }

        if self.database.max_connections == 0 || self.database.max_connections > MAX_DB_CONNECTIONS {
            anyhow::bail!(
                "max_connections must be between 1 and {}, got {}",
                MAX_DB_CONNECTIONS,
                self.database.max_connections
            );
        }

        if log::LevelFilter::from_str(&self.logging.level).is_err() {
            anyhow::bail!("Invalid logging level '{}'", self.logging.level);
        }

        self.validate_seed_areas()
    }

    fn validate_seed_areas(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut codes = HashSet::new();

        for area in &self.seed.areas {
            if area.name.trim().is_empty() {
                anyhow::bail!("Seed area names cannot be empty");
            }

            let code_len = area.code.trim().chars().count();
            if !(AREA_CODE_MIN_LEN..=AREA_CODE_MAX_LEN).contains(&code_len) {
                anyhow::bail!(
                    "Seed area '{}': code must be between {} and {} characters, got '{}'",
                    area.name,
                    AREA_CODE_MIN_LEN,
                    AREA_CODE_MAX_LEN,
                    area.code
                );
            }

            if !names.insert(area.name.as_str()) {
                anyhow::bail!("Duplicate seed area name '{}'", area.name);
            }
            if !codes.insert(area.code.as_str()) {
                anyhow::bail!("Duplicate seed area code '{}'", area.code);
            }
        }

        Ok(())
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        // Add header comment
        let header = format!(
            "# Areatrack Configuration File\n# Generated on {}\n\n",
            datetime::format_ymd(datetime::today())
        );

        let full_content = header + &toml_content;

        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("areatrack"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
