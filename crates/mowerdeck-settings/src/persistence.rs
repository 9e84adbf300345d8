//! Configuration persistence.
//!
//! Loads and saves [`DashboardConfig`] as TOML in the platform config
//! directory. A missing file is not an error: defaults apply and the file
//! is created on first save.

use crate::config::DashboardConfig;
use crate::error::{Result, SettingsError};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "mowerdeck";
const CONFIG_FILE: &str = "config.toml";

/// The platform-specific configuration file path.
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| SettingsError::ConfigDirectory("no config directory".to_string()))?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE))
}

/// Load a configuration, falling back to defaults when the file does not
/// exist. A present-but-invalid file is an error.
pub fn load_from_file(path: &Path) -> Result<DashboardConfig> {
    if !path.exists() {
        tracing::info!("No config at {}, using defaults", path.display());
        return Ok(DashboardConfig::default());
    }
    let text = fs::read_to_string(path)?;
    let config: DashboardConfig = toml::from_str(&text)?;
    config.validate()?;
    Ok(config)
}

/// Save a configuration, creating parent directories as needed.
pub fn save_to_file(config: &DashboardConfig, path: &Path) -> Result<()> {
    config.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let text = toml::to_string_pretty(config)?;
    fs::write(path, text)?;
    tracing::debug!("Saved config to {}", path.display());
    Ok(())
}

/// Load the configuration from the default location.
pub fn load_default() -> Result<DashboardConfig> {
    load_from_file(&default_config_path()?)
}
