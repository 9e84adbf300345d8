//! Driver-state control synchronization.
//!
//! The control pane holds the operator-facing command widgets. Every poll,
//! [`ControlPane::apply_snapshot`] recomputes widget enablement from the
//! reported `state-index` alone — the table is memoryless, any index may
//! follow any other — and syncs indicator state (cutters, speed pair,
//! navigation status, mower selector) from the rest of the snapshot.
//!
//! Operator interactions come back as [`DeviceCommand`] values; the pane
//! never touches the network itself.

use crate::widgets::{WidgetId, WidgetPane};
use mowerdeck_client::DeviceCommand;
use mowerdeck_core::{
    telemetry::{Pose, TelemetrySnapshot},
    Capability, CapabilitySet, ValidationError,
};
use std::f64::consts::PI;
use std::time::{Duration, Instant};

/// How long a local mower selection shadows the server-reported value.
const ECHO_SUPPRESSION: Duration = Duration::from_secs(5);

/// Capabilities the state table locks and unlocks. Everything else on the
/// pane (reset, reboot, shutdown, enrol, cancel) keeps its own enablement.
fn lockable() -> CapabilitySet {
    CapabilitySet::of(&[
        Capability::Cutter1,
        Capability::Cutter2,
        Capability::RobotSpeed,
        Capability::DirectCommand,
        Capability::Drive,
        Capability::Route,
        Capability::Pause,
        Capability::Step,
        Capability::Skip,
    ])
}

/// All capabilities that live on the control pane.
fn pane_capabilities() -> CapabilitySet {
    lockable()
        | CapabilitySet::of(&[
            Capability::MowerSelect,
            Capability::DirectDriveTarget,
            Capability::Cancel,
            Capability::Reset,
            Capability::Reboot,
            Capability::Shutdown,
            Capability::Enrol,
        ])
}

/// The operator command pane.
pub struct ControlPane {
    widgets: WidgetPane,
    enabled: CapabilitySet,
    mowers: Vec<String>,
    selection_changed_at: Option<Instant>,
    pending_speed_pair: Option<String>,
    staged_x: Option<f64>,
    staged_y: Option<f64>,
    last_state_index: Option<u8>,
    last_path: Option<String>,
    resume_token: Option<String>,
}

impl Default for ControlPane {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlPane {
    /// Create a pane in its pre-telemetry state: everything the state
    /// table governs starts locked until the first poll says otherwise.
    pub fn new() -> Self {
        Self {
            widgets: WidgetPane::new(),
            enabled: pane_capabilities() - lockable(),
            mowers: Vec::new(),
            selection_changed_at: None,
            pending_speed_pair: None,
            staged_x: None,
            staged_y: None,
            last_state_index: None,
            last_path: None,
            resume_token: None,
        }
    }

    /// The currently enabled capability set.
    pub fn enabled(&self) -> CapabilitySet {
        self.enabled
    }

    /// Whether a single capability is currently live.
    pub fn is_enabled(&self, cap: Capability) -> bool {
        self.enabled.contains(cap)
    }

    /// The widget registry for the render layer.
    pub fn widgets(&self) -> &WidgetPane {
        &self.widgets
    }

    /// Mutable widget access, e.g. for focus tracking from the renderer.
    pub fn widgets_mut(&mut self) -> &mut WidgetPane {
        &mut self.widgets
    }

    /// The known mower list.
    pub fn mowers(&self) -> &[String] {
        &self.mowers
    }

    /// Replace the mower list shown by the selector.
    pub fn set_mowers(&mut self, mowers: Vec<String>) {
        self.mowers = mowers;
    }

    /// Recompute enablement from a state index. Unlisted indices leave the
    /// current enablement untouched.
    pub fn synchronize(&mut self, index: u8) {
        let mut set = self.enabled;
        match index {
            // No robot selected: everything the table governs locks, and
            // the cutter toggles snap to off without a network command.
            0 => {
                set = set - lockable();
                self.widgets.set_checked(WidgetId::Cutter1Enabled, false);
                self.widgets.set_checked(WidgetId::Cutter2Enabled, false);
            }
            // Idle
            1 => {
                set = set
                    | Capability::MowerSelect
                    | Capability::RobotSpeed
                    | Capability::DirectCommand
                    | Capability::Cutter1
                    | Capability::Cutter2
                    | Capability::DirectDriveTarget
                    | Capability::Route;
                set = set
                    .without(Capability::Pause)
                    .without(Capability::Skip)
                    .without(Capability::Step);
            }
            // Idle with a staged destination
            13 => {
                set = set | Capability::Drive;
            }
            // Driving to a point
            3 => {
                set = set | Capability::Cancel | Capability::Pause;
                set = set
                    .without(Capability::Drive)
                    .without(Capability::Route)
                    .without(Capability::MowerSelect)
                    .without(Capability::Step);
            }
            // Driving a route
            2 => {
                set = set
                    | Capability::RobotSpeed
                    | Capability::Cutter1
                    | Capability::Cutter2
                    | Capability::Cancel
                    | Capability::Skip
                    | Capability::Pause;
                set = set
                    .without(Capability::Route)
                    .without(Capability::Drive)
                    .without(Capability::MowerSelect)
                    .without(Capability::Step);
            }
            // Paused
            4 => {
                set = set | Capability::Step;
            }
            other => {
                tracing::debug!("No widget mapping for state index {}, leaving enablement", other);
            }
        }
        self.enabled = set;
        self.last_state_index = Some(index);
    }

    /// Sync the whole pane from the latest snapshot.
    pub fn apply_snapshot(&mut self, snapshot: &TelemetrySnapshot) {
        if let Some(index) = snapshot.driver.state_index {
            self.synchronize(index);
        }
        if let Some(state) = &snapshot.driver.state {
            self.widgets.set_value(WidgetId::NavigationStatus, state.clone());
        }
        self.last_path = snapshot.driver.path.clone();
        self.resume_token = snapshot
            .driver
            .last_visited_route_node
            .as_ref()
            .and_then(token_string);

        self.sync_mower_selector(snapshot);
        self.sync_cutter_indicators(snapshot);
        self.sync_speed_pair(snapshot);
    }

    /// Server-reported mower, unless the operator changed the selector in
    /// the last few seconds — their choice wins until the window expires.
    fn sync_mower_selector(&mut self, snapshot: &TelemetrySnapshot) {
        if self.selection_in_flight() {
            return;
        }
        if snapshot.driver.is_null_mower() || snapshot.driver.cur_mower.is_none() {
            self.widgets.clear_value(WidgetId::CurrentMower);
        } else if let Some(mower) = &snapshot.driver.cur_mower {
            self.widgets.set_value(WidgetId::CurrentMower, mower.clone());
        }
    }

    fn selection_in_flight(&self) -> bool {
        self.selection_changed_at
            .map(|at| at.elapsed() < ECHO_SUPPRESSION)
            .unwrap_or(false)
    }

    /// Reported cutter activations drive the toggles, but only while the
    /// toggle is live — it is locked during an in-flight cutter command.
    fn sync_cutter_indicators(&mut self, snapshot: &TelemetrySnapshot) {
        if self.enabled.contains(Capability::Cutter1) {
            self.widgets
                .set_checked(WidgetId::Cutter1Enabled, snapshot.telemetry.cutter1 == Some(1));
        }
        if self.enabled.contains(Capability::Cutter2) {
            self.widgets
                .set_checked(WidgetId::Cutter2Enabled, snapshot.telemetry.cutter2 == Some(1));
        }
    }

    /// Reported speed pair, skipped while the operator is mid-edit.
    fn sync_speed_pair(&mut self, snapshot: &TelemetrySnapshot) {
        let Some(pair) = snapshot.driver.speed_pair() else {
            return;
        };
        if let Some(pending) = &self.pending_speed_pair {
            if *pending == pair {
                self.pending_speed_pair = None;
            } else {
                return;
            }
        }
        if self.widgets.state(WidgetId::RobotSpeed).focused {
            return;
        }
        self.widgets.set_value(WidgetId::RobotSpeed, pair);
    }

    /// The operator picked a mower. Starts the echo-suppression window.
    pub fn select_mower(&mut self, name: impl Into<String>) -> DeviceCommand {
        let name = name.into();
        self.selection_changed_at = Some(Instant::now());
        self.widgets.set_value(WidgetId::CurrentMower, name.clone());
        DeviceCommand::SelectMower { name }
    }

    /// The operator picked a speed pair.
    pub fn set_speeds(&mut self, pair: impl Into<String>) -> DeviceCommand {
        let pair = pair.into();
        self.pending_speed_pair = Some(pair.clone());
        self.widgets.set_value(WidgetId::RobotSpeed, pair.clone());
        DeviceCommand::SetSpeeds { pair }
    }

    /// The operator toggled a cutter. The toggle locks until the next poll
    /// confirms the new state through the table.
    pub fn toggle_cutter(&mut self, index: u8, on: bool) -> DeviceCommand {
        let cap = if index == 1 {
            Capability::Cutter1
        } else {
            Capability::Cutter2
        };
        self.enabled = self.enabled.without(cap);
        let widget = if index == 1 {
            WidgetId::Cutter1Enabled
        } else {
            WidgetId::Cutter2Enabled
        };
        self.widgets.set_checked(widget, on);
        DeviceCommand::Cutter { index, on }
    }

    /// Free-form direct command.
    pub fn direct_command(&mut self, command: impl Into<String>) -> DeviceCommand {
        DeviceCommand::DirectDrive {
            command: command.into(),
        }
    }

    /// Stage a drive destination from a target item.
    ///
    /// Three item forms: an absolute `x|y` pair in metres, a relative pair
    /// (any `+`/`-` anywhere in the item makes the whole pair an offset
    /// from the current pose), and a forward projection `F<d>` along the
    /// current heading. Results are rounded to 2 decimal places.
    pub fn stage_destination(&mut self, item: &str, pose: &Pose) {
        let staged = compute_drive_to(item, pose);
        if let Some((x, y)) = staged {
            self.staged_x = Some(x);
            self.staged_y = Some(y);
            self.widgets.set_value(WidgetId::DriveToX, format!("{x}"));
            self.widgets.set_value(WidgetId::DriveToY, format!("{y}"));
            self.enabled = self.enabled.with(Capability::Drive);
        }
    }

    /// The staged destination, if complete.
    pub fn staged_destination(&self) -> Option<(f64, f64)> {
        self.staged_x.zip(self.staged_y)
    }

    /// Drive to the staged destination. Refused locally when no
    /// destination is known; nothing is sent in that case.
    pub fn drive_to(&mut self) -> Result<DeviceCommand, ValidationError> {
        match (self.staged_x, self.staged_y) {
            (Some(x), Some(y)) => {
                self.synchronize(3);
                Ok(DeviceCommand::Drive { x, y })
            }
            (None, None) => Err(ValidationError::field(
                "drive-to",
                "no destination staged",
            )),
            _ => Err(ValidationError::field(
                "drive-to",
                "destination incomplete",
            )),
        }
    }

    /// Drive the stored route. Applies the route-driving enablement
    /// optimistically before the write; the next poll corrects if needed.
    pub fn drive_route(&mut self, resume: bool) -> DeviceCommand {
        self.synchronize(2);
        DeviceCommand::DriveRoute {
            resume_token: if resume { self.resume_token.clone() } else { None },
        }
    }

    /// The resume token from the last interrupted route, if any.
    pub fn resume_token(&self) -> Option<&str> {
        self.resume_token.as_deref()
    }

    /// Cancel the current drive, optimistically returning to idle.
    pub fn cancel_drive(&mut self) -> DeviceCommand {
        self.synchronize(1);
        DeviceCommand::CancelDrive
    }

    /// Pause or unpause the current drive. Unpausing restores the route or
    /// point-drive enablement depending on the reported path kind.
    pub fn pause_drive(&mut self) -> DeviceCommand {
        if self.last_state_index == Some(4) {
            let resumed = if self.last_path.as_deref() == Some("Route") {
                2
            } else {
                3
            };
            self.synchronize(resumed);
        } else {
            self.synchronize(4);
        }
        DeviceCommand::PauseDrive
    }

    /// Skip the current route node.
    pub fn skip(&self) -> DeviceCommand {
        DeviceCommand::Skip
    }

    /// Single-step while paused.
    pub fn step_drive(&self) -> DeviceCommand {
        DeviceCommand::StepDrive
    }

    /// Reset the navigation state.
    pub fn reset(&self) -> DeviceCommand {
        DeviceCommand::Reset
    }

    /// Reboot the server.
    pub fn reboot(&self) -> DeviceCommand {
        DeviceCommand::Reboot
    }

    /// Shut the server down.
    pub fn shutdown(&self) -> DeviceCommand {
        DeviceCommand::Shutdown
    }

    /// Enrol the mower in this hotspot.
    pub fn enrol_hotspot(&self) -> DeviceCommand {
        DeviceCommand::EnrolHotspot
    }
}

fn token_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Resolve a drive-to target item against the current pose.
fn compute_drive_to(item: &str, pose: &Pose) -> Option<(f64, f64)> {
    let item = item.trim();
    if let Some(distance) = item
        .strip_prefix('F')
        .or_else(|| item.strip_prefix('f'))
        .and_then(|d| d.parse::<f64>().ok())
    {
        // Forward projection along the heading. Heading zero points down
        // the arena, hence the half-turn offset.
        let x = pose.x_m?;
        let y = pose.y_m?;
        let rad = pose.theta_deg? * PI / 180.0 - PI;
        return Some((round2(x + distance * rad.sin()), round2(y - distance * rad.cos())));
    }

    let (raw_x, raw_y) = item.split_once('|')?;
    let x = raw_x.trim().parse::<f64>().ok()?;
    let y = raw_y.trim().parse::<f64>().ok()?;

    // A sign anywhere makes the whole pair an offset from the pose.
    if item.contains('+') || item.contains('-') {
        Some((round2(pose.x_m? + x), round2(pose.y_m? + y)))
    } else {
        Some((round2(x), round2(y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mowerdeck_core::telemetry::{Driver, Telemetry};

    fn snapshot_with_index(index: u8) -> TelemetrySnapshot {
        TelemetrySnapshot {
            driver: Driver {
                state_index: Some(index),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_index_zero_locks_everything_and_unchecks_cutters() {
        let mut pane = ControlPane::new();
        // Start from a fully live idle pane with cutters on.
        pane.synchronize(1);
        pane.widgets.set_checked(WidgetId::Cutter1Enabled, true);
        pane.widgets.set_checked(WidgetId::Cutter2Enabled, true);

        pane.synchronize(0);

        assert!((pane.enabled() & lockable()).is_empty());
        assert!(!pane.widgets().state(WidgetId::Cutter1Enabled).checked);
        assert!(!pane.widgets().state(WidgetId::Cutter2Enabled).checked);
        // Non-lockable controls stay live so a robot can still be picked.
        assert!(pane.is_enabled(Capability::MowerSelect));
    }

    #[test]
    fn test_state_table_per_index() {
        let mut pane = ControlPane::new();

        pane.synchronize(1);
        assert!(pane.is_enabled(Capability::Route));
        assert!(pane.is_enabled(Capability::Cutter1));
        assert!(!pane.is_enabled(Capability::Pause));
        assert!(!pane.is_enabled(Capability::Step));

        pane.synchronize(13);
        assert!(pane.is_enabled(Capability::Drive));

        pane.synchronize(3);
        assert!(pane.is_enabled(Capability::Cancel));
        assert!(pane.is_enabled(Capability::Pause));
        assert!(!pane.is_enabled(Capability::Drive));
        assert!(!pane.is_enabled(Capability::MowerSelect));

        pane.synchronize(2);
        assert!(pane.is_enabled(Capability::Skip));
        assert!(pane.is_enabled(Capability::Cutter2));
        assert!(!pane.is_enabled(Capability::Route));

        pane.synchronize(4);
        assert!(pane.is_enabled(Capability::Step));
    }

    #[test]
    fn test_unlisted_index_is_a_no_op() {
        let mut pane = ControlPane::new();
        pane.synchronize(1);
        let before = pane.enabled();

        for index in 5..=12 {
            pane.synchronize(index);
            assert_eq!(pane.enabled(), before, "index {index} must not change enablement");
        }
    }

    #[test]
    fn test_table_is_memoryless_across_any_transition() {
        // Any index may follow any other; 3 after 13 must not depend on
        // having passed through 2 or 4.
        let mut pane = ControlPane::new();
        pane.synchronize(13);
        pane.synchronize(3);
        assert!(pane.is_enabled(Capability::Cancel));
        assert!(!pane.is_enabled(Capability::Drive));
    }

    #[test]
    fn test_mower_echo_suppression_window() {
        let mut pane = ControlPane::new();
        let cmd = pane.select_mower("mower-1");
        assert_eq!(
            cmd,
            DeviceCommand::SelectMower {
                name: "mower-1".to_string()
            }
        );

        // Server still reports the old mower; the local choice wins.
        let mut snap = snapshot_with_index(1);
        snap.driver.cur_mower = Some("mower-0".to_string());
        pane.apply_snapshot(&snap);
        assert_eq!(
            pane.widgets().state(WidgetId::CurrentMower).value.as_deref(),
            Some("mower-1")
        );

        // After the window expires the server value takes over again.
        pane.selection_changed_at = Some(Instant::now() - Duration::from_secs(6));
        pane.apply_snapshot(&snap);
        assert_eq!(
            pane.widgets().state(WidgetId::CurrentMower).value.as_deref(),
            Some("mower-0")
        );
    }

    #[test]
    fn test_null_mower_clears_selector() {
        let mut pane = ControlPane::new();
        pane.widgets.set_value(WidgetId::CurrentMower, "mower-1");

        let mut snap = snapshot_with_index(0);
        snap.driver.cur_mower = Some("None".to_string());
        pane.apply_snapshot(&snap);
        assert!(pane.widgets().state(WidgetId::CurrentMower).value.is_none());
    }

    #[test]
    fn test_cutter_indicator_gated_on_enablement() {
        let mut pane = ControlPane::new();
        let mut snap = snapshot_with_index(1);
        snap.telemetry = Telemetry {
            cutter1: Some(1),
            cutter2: Some(0),
            ..Default::default()
        };
        pane.apply_snapshot(&snap);
        assert!(pane.widgets().state(WidgetId::Cutter1Enabled).checked);
        assert!(!pane.widgets().state(WidgetId::Cutter2Enabled).checked);

        // A locked toggle (in-flight command) ignores the report.
        let cmd = pane.toggle_cutter(1, false);
        assert_eq!(
            cmd,
            DeviceCommand::Cutter {
                index: 1,
                on: false
            }
        );
        snap.driver.state_index = None; // no resync of the table
        pane.apply_snapshot(&snap);
        assert!(!pane.widgets().state(WidgetId::Cutter1Enabled).checked);
    }

    #[test]
    fn test_speed_pair_skipped_while_editing() {
        let mut pane = ControlPane::new();
        let mut snap = snapshot_with_index(1);
        snap.driver.rot_speed = Some(45.0);
        snap.driver.drv_speed = Some(70.0);

        pane.apply_snapshot(&snap);
        assert_eq!(
            pane.widgets().state(WidgetId::RobotSpeed).value.as_deref(),
            Some("45.70")
        );

        // A pending local change holds until the server echoes it back.
        pane.set_speeds("50.80");
        pane.apply_snapshot(&snap);
        assert_eq!(
            pane.widgets().state(WidgetId::RobotSpeed).value.as_deref(),
            Some("50.80")
        );

        snap.driver.rot_speed = Some(50.0);
        snap.driver.drv_speed = Some(80.0);
        pane.apply_snapshot(&snap);
        assert_eq!(
            pane.widgets().state(WidgetId::RobotSpeed).value.as_deref(),
            Some("50.80")
        );
        assert!(pane.pending_speed_pair.is_none());
    }

    #[test]
    fn test_compute_drive_to_forms() {
        let pose = Pose {
            x_m: Some(3.0),
            y_m: Some(7.0),
            theta_deg: Some(0.0),
        };

        assert_eq!(compute_drive_to("2.5|4.25", &pose), Some((2.5, 4.25)));
        assert_eq!(compute_drive_to("+0.5|-0.25", &pose), Some((3.5, 6.75)));
        // A sign on either component makes the whole pair relative.
        assert_eq!(compute_drive_to("2|-1", &pose), Some((5.0, 6.0)));

        // Heading 0 with the half-turn offset projects straight up the
        // arena: sin(-pi) ~ 0, cos(-pi) = -1.
        let (fx, fy) = compute_drive_to("F2", &pose).expect("forward projection");
        assert!((fx - 3.0).abs() < 1e-9);
        assert!((fy - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_drive_to_requires_a_destination() {
        let mut pane = ControlPane::new();
        let err = pane.drive_to().expect_err("nothing staged");
        assert_eq!(err.first_field.as_deref(), Some("drive-to"));

        let pose = Pose {
            x_m: Some(1.0),
            y_m: Some(1.0),
            theta_deg: Some(0.0),
        };
        pane.stage_destination("4|5", &pose);
        assert!(pane.is_enabled(Capability::Drive));
        let cmd = pane.drive_to().expect("staged destination");
        assert_eq!(cmd, DeviceCommand::Drive { x: 4.0, y: 5.0 });
        // Optimistic transition to driving-to-point.
        assert!(pane.is_enabled(Capability::Cancel));
    }

    #[test]
    fn test_route_resume_and_pause_round_trip() {
        let mut pane = ControlPane::new();
        let mut snap = snapshot_with_index(2);
        snap.driver.last_visited_route_node = Some(serde_json::json!(17));
        snap.driver.path = Some("Route".to_string());
        pane.apply_snapshot(&snap);
        assert_eq!(pane.resume_token(), Some("17"));

        let resume = pane.drive_route(true);
        assert_eq!(
            resume,
            DeviceCommand::DriveRoute {
                resume_token: Some("17".to_string())
            }
        );

        // Pause, then unpause back into route enablement.
        pane.pause_drive();
        assert!(pane.is_enabled(Capability::Step));
        pane.pause_drive();
        assert!(pane.is_enabled(Capability::Skip));
        assert!(!pane.is_enabled(Capability::Route));
    }
}
