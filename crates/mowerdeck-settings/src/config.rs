//! Dashboard configuration.
//!
//! Organized into logical sections:
//! - Device settings (server URL, poll cadence)
//! - Arena settings (physical dimensions, calibration)
//! - Editor settings (debounce, nudge step, grow percentage)

use crate::error::{Result, SettingsError};
use serde::{Deserialize, Serialize};

/// Connection and polling settings for the mower server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Server base URL, no trailing slash.
    pub base_url: String,
    /// Poll resource path relative to the base URL.
    pub status_path: String,
    /// Interval between poll cycles, milliseconds.
    pub refresh_rate_ms: u64,
    /// Fixed-cadence polling that permits overlapping fetches.
    pub free_running: bool,
    /// Append a timestamp to the poll URL to defeat intermediary caches.
    pub cache_buster: bool,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://mower.local:8081".to_string(),
            status_path: "status".to_string(),
            refresh_rate_ms: 1000,
            free_running: false,
            cache_buster: true,
        }
    }
}

/// Physical arena dimensions and the camera calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaSettings {
    /// Arena width, metres.
    pub width_m: f64,
    /// Arena length, metres.
    pub length_m: f64,
    /// Render surface width, device pixels.
    pub device_width_px: f64,
    /// Render surface height, device pixels.
    pub device_height_px: f64,
    /// 3x3 homogeneous calibration matrix, pixels to metres, row-major.
    pub calibration: [[f64; 3]; 3],
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            width_m: 8.0,
            length_m: 12.0,
            device_width_px: 640.0,
            device_height_px: 480.0,
            calibration: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }
}

/// Point editor behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Quiet period before staged point writes flush, milliseconds.
    pub write_debounce_ms: u64,
    /// Nudge distance in normalized units.
    pub nudge_step: f64,
    /// Expand/contract step as a percentage of the scaffold range.
    pub grow_percent: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            write_debounce_ms: 1000,
            nudge_step: 50.0,
            grow_percent: 5.0,
        }
    }
}

/// The complete dashboard configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Mower server connection and polling.
    #[serde(default)]
    pub device: DeviceSettings,
    /// Arena geometry and calibration.
    #[serde(default)]
    pub arena: ArenaSettings,
    /// Point editor behavior.
    #[serde(default)]
    pub editor: EditorSettings,
}

impl DashboardConfig {
    /// Check every section for values that cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.device.base_url.is_empty() {
            return Err(SettingsError::InvalidSetting {
                key: "device.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.device.refresh_rate_ms == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "device.refresh_rate_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.arena.width_m <= 0.0 || self.arena.length_m <= 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "arena".to_string(),
                reason: "dimensions must be positive".to_string(),
            });
        }
        if self.arena.device_width_px <= 0.0 || self.arena.device_height_px <= 0.0 {
            return Err(SettingsError::InvalidSetting {
                key: "arena".to_string(),
                reason: "device size must be positive".to_string(),
            });
        }
        if self.editor.grow_percent <= 0.0 || self.editor.grow_percent > 100.0 {
            return Err(SettingsError::InvalidSetting {
                key: "editor.grow_percent".to_string(),
                reason: "must be in (0, 100]".to_string(),
            });
        }
        Ok(())
    }
}
