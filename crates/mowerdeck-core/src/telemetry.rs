//! Telemetry wire model.
//!
//! A poll of the device's status endpoint returns one JSON document with
//! four nested objects keyed `Telemetry`, `Pose`, `Driver` and `Locator`.
//! Each poll supersedes the previous snapshot wholesale; nothing is merged.
//! Consumers treat the snapshot as read-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One complete poll result. Created per successful fetch, discarded after
/// the panes have updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Device sensor readings (wifi, battery, cutters).
    #[serde(rename = "Telemetry", default)]
    pub telemetry: Telemetry,
    /// Position estimate in arena metres.
    #[serde(rename = "Pose", default)]
    pub pose: Pose,
    /// Motion-control status.
    #[serde(rename = "Driver", default)]
    pub driver: Driver,
    /// Self-localization diagnostics.
    #[serde(rename = "Locator", default)]
    pub locator: Locator,
}

/// Sensor readings reported by the mower.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Telemetry {
    /// Cutter 1 activation, 0 or 1.
    #[serde(default)]
    pub cutter1: Option<u8>,
    /// Cutter 2 activation, 0 or 1.
    #[serde(default)]
    pub cutter2: Option<u8>,
    /// Wifi signal strength in dBm.
    #[serde(default)]
    pub rssi: Option<f64>,
    /// Access point name.
    #[serde(default)]
    pub essid: Option<String>,
    /// Link quality string, e.g. "60/70".
    #[serde(default)]
    pub wifi_quality: Option<String>,
    /// Raw analog channels; slot 0 is the battery, 0..1024.
    #[serde(default)]
    pub analogs: Vec<f64>,
    /// Arbitrary named sensor readings.
    #[serde(default)]
    pub sensors: BTreeMap<String, serde_json::Value>,
    /// Mower uptime at last report, milliseconds.
    #[serde(rename = "last-update", default)]
    pub last_update_ms: Option<f64>,
    /// Unix time of the last successful fetch from the mower, seconds.
    #[serde(rename = "last-fetch", default)]
    pub last_fetch_secs: Option<f64>,
}

impl Telemetry {
    /// Battery charge as a percentage of the 10-bit analog range.
    pub fn battery_percent(&self) -> Option<f64> {
        self.analogs.first().map(|raw| raw * 100.0 / 1024.0)
    }

    /// True when the mower reported nothing at all this cycle.
    pub fn is_empty(&self) -> bool {
        self.rssi.is_none() && self.essid.is_none() && self.analogs.is_empty()
    }
}

/// Position estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pose {
    /// X position, arena metres.
    #[serde(rename = "c_x_m", default)]
    pub x_m: Option<f64>,
    /// Y position, arena metres.
    #[serde(rename = "c_y_m", default)]
    pub y_m: Option<f64>,
    /// Heading, degrees.
    #[serde(rename = "t_deg", default)]
    pub theta_deg: Option<f64>,
}

/// Motion-control status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Driver {
    /// Human-readable navigation state.
    #[serde(default)]
    pub state: Option<String>,
    /// Small integer driving the widget state machine, 0..13.
    #[serde(rename = "state-index", default)]
    pub state_index: Option<u8>,
    /// Currently selected mower name; "None" when unselected.
    #[serde(rename = "cur-mower", default)]
    pub cur_mower: Option<String>,
    /// Rotation speed setting.
    #[serde(rename = "rot-speed", default)]
    pub rot_speed: Option<f64>,
    /// Drive speed setting.
    #[serde(rename = "drv-speed", default)]
    pub drv_speed: Option<f64>,
    /// Opaque resume token for an interrupted route.
    #[serde(default)]
    pub last_visited_route_node: Option<serde_json::Value>,
    /// Current drive path kind: "Route", "Single", "Fence" or absent.
    #[serde(default)]
    pub path: Option<String>,
    /// True while the drive is paused.
    #[serde(default)]
    pub drive_pause: Option<bool>,
    /// Recently issued drive commands.
    #[serde(default)]
    pub last_cmds: Vec<String>,
    /// Recently completed drive commands.
    #[serde(default)]
    pub last_comp_cmds: Vec<String>,
}

impl Driver {
    /// True when the server reports no mower selected.
    pub fn is_null_mower(&self) -> bool {
        matches!(self.cur_mower.as_deref(), Some("None"))
    }

    /// The speed pair in selector form, `"<rot>.<drv>"`.
    pub fn speed_pair(&self) -> Option<String> {
        match (self.rot_speed, self.drv_speed) {
            (Some(rot), Some(drv)) => Some(format!("{}.{}", rot, drv)),
            _ => None,
        }
    }
}

/// Self-localization diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Locator {
    /// Whether the best projection located the robot this cycle.
    #[serde(default)]
    pub best_proj_found: Option<bool>,
    /// Confidence of the best projection, percent.
    #[serde(default)]
    pub best_proj_conf_pc: Option<f64>,
    /// Rolling localization quality, percent.
    #[serde(default)]
    pub loc_quality: Option<f64>,
    /// Number of samples behind the quality figure.
    #[serde(default)]
    pub loc_stat_count: Option<u64>,
    /// Contours surviving filtering.
    #[serde(default)]
    pub fltrd_count: Option<u64>,
    /// Total contours considered.
    #[serde(default)]
    pub cont_count: Option<u64>,
    /// Wall-clock seconds for the locate pass.
    #[serde(default)]
    pub run_elapsed_secs: Option<f64>,
    /// Times the pose had to be extrapolated.
    #[serde(default)]
    pub extrapolation_incidents: Option<u64>,
    /// Why the robot was not found, when it wasn't.
    #[serde(default)]
    pub failure_reason: Option<String>,
}
