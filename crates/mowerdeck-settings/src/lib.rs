//! # MowerDeck Settings
//!
//! Configuration for the dashboard: device connection and polling, arena
//! geometry and calibration, and point-editor behavior. Stored as TOML in
//! the platform config directory.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{ArenaSettings, DashboardConfig, DeviceSettings, EditorSettings};
pub use error::{Result, SettingsError};
pub use persistence::{default_config_path, load_default, load_from_file, save_to_file};
