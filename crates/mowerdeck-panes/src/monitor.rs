//! Telemetry monitor pane.
//!
//! Derives the read-only indicators from the latest snapshot: wifi tier,
//! battery level and fill, found/lost state, pose readouts and compass,
//! plus the hover annotations behind each indicator. All derivations are
//! pure functions over the snapshot; the pane just caches them in the
//! widget registry for the render layer.

use crate::widgets::{WidgetId, WidgetPane};
use mowerdeck_client::DeviceCommand;
use mowerdeck_core::telemetry::TelemetrySnapshot;

/// Wifi signal tier derived from rssi.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiTier {
    /// No mower selected or no rssi reported.
    Offline,
    /// Very weak signal.
    Tier1,
    /// Weak signal.
    Tier2,
    /// Good signal.
    Tier3,
    /// Strong signal.
    Tier4,
}

impl WifiTier {
    /// Tier from the reported rssi. Boundary values: exactly -70 dBm is
    /// tier 3, exactly -67 dBm is tier 4.
    pub fn from_snapshot(snapshot: &TelemetrySnapshot) -> Self {
        if snapshot.driver.is_null_mower() || snapshot.driver.cur_mower.is_none() {
            return WifiTier::Offline;
        }
        let Some(rssi) = snapshot.telemetry.rssi else {
            return WifiTier::Offline;
        };
        if rssi >= -67.0 {
            WifiTier::Tier4
        } else if rssi >= -70.0 {
            WifiTier::Tier3
        } else if rssi > -90.0 {
            WifiTier::Tier2
        } else {
            WifiTier::Tier1
        }
    }

    /// Visual class for the indicator.
    pub fn css_class(self) -> &'static str {
        match self {
            WifiTier::Offline => "wifi-offline",
            WifiTier::Tier1 => "wifi-1",
            WifiTier::Tier2 => "wifi-2",
            WifiTier::Tier3 => "wifi-3",
            WifiTier::Tier4 => "wifi-4",
        }
    }
}

/// Battery charge tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    /// No battery reading available.
    Offline,
    /// Charge at or below 25%.
    Low,
    /// Charge above 25%.
    Medium,
    /// Charge above 50%.
    High,
}

impl BatteryLevel {
    /// Tier from a charge percentage.
    pub fn from_percent(percent: Option<f64>) -> Self {
        match percent {
            Some(p) if p > 50.0 => BatteryLevel::High,
            Some(p) if p > 25.0 => BatteryLevel::Medium,
            Some(p) if p >= 0.0 => BatteryLevel::Low,
            _ => BatteryLevel::Offline,
        }
    }

    /// Visual class for the indicator.
    pub fn css_class(self) -> &'static str {
        match self {
            BatteryLevel::Offline => "battery-offline",
            BatteryLevel::Low => "battery-low",
            BatteryLevel::Medium => "battery-medium",
            BatteryLevel::High => "battery-high",
        }
    }
}

/// Fill height of the battery glyph for a charge percentage.
pub fn battery_fill(percent: f64) -> f64 {
    percent / 1.33 + 25.0
}

/// Format elapsed seconds as `hh:mm:ss`.
pub fn seconds_to_time(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// The read-only telemetry pane.
#[derive(Debug, Default)]
pub struct MonitorPane {
    widgets: WidgetPane,
    stopped: bool,
}

impl MonitorPane {
    /// Create an empty pane.
    pub fn new() -> Self {
        Self::default()
    }

    /// The widget registry for the render layer.
    pub fn widgets(&self) -> &WidgetPane {
        &self.widgets
    }

    /// Whether the emergency stop is latched.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Latch or release the emergency stop. The caller pauses or resumes
    /// the scheduler to match, and sends the returned command.
    pub fn emergency_stop(&mut self) -> DeviceCommand {
        self.stopped = !self.stopped;
        self.widgets.state_mut(WidgetId::EmergencyStop).depressed = self.stopped;
        DeviceCommand::Stop
    }

    /// Refresh every indicator from the latest snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &TelemetrySnapshot) {
        self.sync_wifi(snapshot);
        self.sync_battery(snapshot);
        self.sync_found(snapshot);
        self.sync_pose(snapshot);
        self.widgets.state_mut(WidgetId::Battery).title = Some(measurement_annotation(snapshot));
    }

    fn sync_wifi(&mut self, snapshot: &TelemetrySnapshot) {
        let tier = WifiTier::from_snapshot(snapshot);
        self.widgets
            .set_css_class(WidgetId::WifiStrength, tier.css_class());
        self.widgets.state_mut(WidgetId::WifiStrength).title = Some(online_annotation(snapshot));
    }

    fn sync_battery(&mut self, snapshot: &TelemetrySnapshot) {
        let percent = snapshot.telemetry.battery_percent();
        let level = BatteryLevel::from_percent(percent);
        self.widgets
            .set_css_class(WidgetId::Battery, level.css_class());
        match percent {
            Some(p) => self
                .widgets
                .set_value(WidgetId::Battery, format!("{:.0}", battery_fill(p))),
            None => self.widgets.clear_value(WidgetId::Battery),
        }
    }

    fn sync_found(&mut self, snapshot: &TelemetrySnapshot) {
        let found = snapshot.locator.best_proj_found.unwrap_or(false);
        self.widgets.set_css_class(
            WidgetId::Found,
            if found { "robot-found" } else { "robot-lost" },
        );
        self.widgets.state_mut(WidgetId::Found).title = Some(found_annotation(snapshot));
    }

    /// Pose readouts blank when absent or negative; the compass needle
    /// rotates opposite the heading and hides when the heading is unknown.
    fn sync_pose(&mut self, snapshot: &TelemetrySnapshot) {
        set_pose_value(&mut self.widgets, WidgetId::RobotXm, snapshot.pose.x_m);
        set_pose_value(&mut self.widgets, WidgetId::RobotYm, snapshot.pose.y_m);
        set_pose_value(&mut self.widgets, WidgetId::RobotTheta, snapshot.pose.theta_deg);

        let compass = self.widgets.state_mut(WidgetId::Compass);
        match snapshot.pose.theta_deg {
            Some(theta) => {
                compass.visible = true;
                compass.value = Some(format!("{}", -theta));
            }
            None => {
                compass.visible = false;
                compass.value = None;
            }
        }
    }
}

fn set_pose_value(widgets: &mut WidgetPane, id: WidgetId, value: Option<f64>) {
    match value {
        Some(v) if v >= 0.0 => widgets.set_value(id, format!("{v:.2}")),
        _ => widgets.clear_value(id),
    }
}

/// Connection annotation: access point, signal, quality, uptime and the
/// age of the mower's own last report.
pub fn online_annotation(snapshot: &TelemetrySnapshot) -> String {
    let tel = &snapshot.telemetry;
    let mut lines = Vec::new();
    if let Some(essid) = &tel.essid {
        lines.push(format!("ap: {essid}"));
    }
    if let Some(rssi) = tel.rssi {
        lines.push(format!("signal: {rssi} dBm"));
    }
    if let Some(quality) = &tel.wifi_quality {
        lines.push(format!("quality: {quality}"));
    }
    if let Some(uptime_ms) = tel.last_update_ms {
        lines.push(format!("up: {}", seconds_to_time(uptime_ms / 1000.0)));
    }
    if let Some(fetched) = tel.last_fetch_secs {
        lines.push(format!("fetched: {fetched:.0}"));
    }
    if lines.is_empty() {
        "offline".to_string()
    } else {
        lines.join("\n")
    }
}

/// Sensor annotation: every named reading the mower reported.
pub fn measurement_annotation(snapshot: &TelemetrySnapshot) -> String {
    snapshot
        .telemetry
        .sensors
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Localization annotation: locate timing, confidence, quality and contour
/// statistics, plus the failure reason when the robot is lost.
pub fn found_annotation(snapshot: &TelemetrySnapshot) -> String {
    let loc = &snapshot.locator;
    let mut lines = Vec::new();
    if let Some(elapsed) = loc.run_elapsed_secs {
        if elapsed > 0.0 {
            lines.push(format!("locate: {:.2}s ({:.1} fps)", elapsed, 1.0 / elapsed));
        }
    }
    if let Some(conf) = loc.best_proj_conf_pc {
        lines.push(format!("confidence: {conf:.0}%"));
    }
    if let (Some(quality), Some(count)) = (loc.loc_quality, loc.loc_stat_count) {
        lines.push(format!("quality: {quality:.0}% of {count}"));
    }
    if let (Some(filtered), Some(total)) = (loc.fltrd_count, loc.cont_count) {
        lines.push(format!("contours: {filtered}/{total}"));
    }
    if let Some(incidents) = loc.extrapolation_incidents {
        lines.push(format!("extrapolations: {incidents}"));
    }
    if loc.best_proj_found != Some(true) {
        if let Some(reason) = &loc.failure_reason {
            lines.push(format!("lost: {reason}"));
        }
    }
    lines.join("\n")
}
