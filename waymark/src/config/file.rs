//! Configuration file handling for ~/.waymark/orchestrator.ini.
//!
//! Loads user configuration with sensible defaults. Settings structs live
//! in [`super::settings`], constants in [`super::defaults`].

use super::settings::*;
use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl OrchestratorSettings {
    /// Load configuration from the default path (~/.waymark/orchestrator.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults. Sections and keys not
    /// present in the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let mut ini = Ini::new();
        ini.with_section(Some("pool"))
            .set("slots", self.pool.slots.to_string());
        ini.with_section(Some("search"))
            .set("dedup_angle", self.search.dedup_angle.to_string());
        ini.with_section(Some("routing"))
            .set(
                "similarity_cutoff",
                self.routing.similarity_cutoff.to_string(),
            )
            .set("window_min_ms", self.routing.window_min_ms.to_string())
            .set("window_max_ms", self.routing.window_max_ms.to_string())
            .set(
                "latency_multiplier",
                self.routing.latency_multiplier.to_string(),
            )
            .set("raster_size", self.routing.raster_size.to_string());
        ini.with_section(Some("wait"))
            .set(
                "default_timeout_secs",
                self.wait.default_timeout_secs.to_string(),
            );

        ini.write_to_file(path)
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

/// Get the path to the config directory (~/.waymark).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".waymark")
}

/// Get the path to the config file (~/.waymark/orchestrator.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("orchestrator.ini")
}

fn parse_ini(ini: &Ini) -> Result<OrchestratorSettings, ConfigError> {
    let mut settings = OrchestratorSettings::default();

    if let Some(section) = ini.section(Some("pool")) {
        if let Some(value) = section.get("slots") {
            settings.pool.slots = parse_value("pool", "slots", value)?;
        }
    }

    if let Some(section) = ini.section(Some("search")) {
        if let Some(value) = section.get("dedup_angle") {
            settings.search.dedup_angle = parse_value("search", "dedup_angle", value)?;
        }
    }

    if let Some(section) = ini.section(Some("routing")) {
        if let Some(value) = section.get("similarity_cutoff") {
            settings.routing.similarity_cutoff =
                parse_value("routing", "similarity_cutoff", value)?;
        }
        if let Some(value) = section.get("window_min_ms") {
            settings.routing.window_min_ms = parse_value("routing", "window_min_ms", value)?;
        }
        if let Some(value) = section.get("window_max_ms") {
            settings.routing.window_max_ms = parse_value("routing", "window_max_ms", value)?;
        }
        if let Some(value) = section.get("latency_multiplier") {
            settings.routing.latency_multiplier =
                parse_value("routing", "latency_multiplier", value)?;
        }
        if let Some(value) = section.get("raster_size") {
            settings.routing.raster_size = parse_value("routing", "raster_size", value)?;
        }
    }

    if let Some(section) = ini.section(Some("wait")) {
        if let Some(value) = section.get("default_timeout_secs") {
            settings.wait.default_timeout_secs =
                parse_value("wait", "default_timeout_secs", value)?;
        }
    }

    Ok(settings)
}

fn parse_value<T: std::str::FromStr>(
    section: &str,
    key: &str,
    value: &str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: format!("expected a {}", std::any::type_name::<T>()),
    })
}
