//! Logical widget registry.
//!
//! The panes describe what the screen should show as a map from widget
//! name to a plain state record. A render layer walks the registry and
//! applies it; the panes themselves never see a control tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Logical name of a dashboard widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WidgetId {
    /// Mower selector dropdown.
    CurrentMower,
    /// Speed-pair selector.
    RobotSpeed,
    /// Free-form direct command entry.
    DirectCommand,
    /// Cutter 1 toggle.
    Cutter1Enabled,
    /// Cutter 2 toggle.
    Cutter2Enabled,
    /// Direct-drive target selector.
    DirectDrive,
    /// Drive-to-destination action.
    Drive,
    /// Drive-route action.
    Route,
    /// Cancel-drive action.
    Cancel,
    /// Pause-drive action.
    Pause,
    /// Skip-node action.
    Skip,
    /// Single-step action.
    Step,
    /// Navigation reset action.
    Reset,
    /// Server reboot action.
    Reboot,
    /// Server shutdown action.
    Shutdown,
    /// Hotspot enrolment action.
    Enrol,
    /// Navigation status text.
    NavigationStatus,
    /// Staged destination X field.
    DriveToX,
    /// Staged destination Y field.
    DriveToY,
    /// Wifi strength indicator.
    WifiStrength,
    /// Battery indicator.
    Battery,
    /// Robot found/lost indicator.
    Found,
    /// Emergency stop control.
    EmergencyStop,
    /// Pose X readout.
    RobotXm,
    /// Pose Y readout.
    RobotYm,
    /// Pose heading readout.
    RobotTheta,
    /// Heading compass needle.
    Compass,
    /// Selected-point info readout.
    NodeInfo,
}

/// Displayable state of one widget. Fields a given widget never uses
/// stay at their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetState {
    /// Whether the widget accepts interaction.
    pub enabled: bool,
    /// Toggle state for checkable widgets.
    pub checked: bool,
    /// Displayed value, if any.
    pub value: Option<String>,
    /// Visual class, e.g. a wifi tier.
    pub css_class: Option<String>,
    /// Hover/annotation text.
    pub title: Option<String>,
    /// Whether the widget is shown at all.
    pub visible: bool,
    /// Pressed-in state for latching buttons.
    pub depressed: bool,
    /// Whether the widget currently has input focus. Set by the render
    /// layer, read by the panes to avoid clobbering an in-progress edit.
    pub focused: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            enabled: true,
            checked: false,
            value: None,
            css_class: None,
            title: None,
            visible: true,
            depressed: false,
            focused: false,
        }
    }
}

/// Registry of widget states, keyed by logical name.
#[derive(Debug, Clone, Default)]
pub struct WidgetPane {
    states: BTreeMap<WidgetId, WidgetState>,
}

impl WidgetPane {
    /// Create an empty registry; widgets materialize on first touch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a widget's state, defaulted if never touched.
    pub fn state(&self, id: WidgetId) -> WidgetState {
        self.states.get(&id).cloned().unwrap_or_default()
    }

    /// Mutable access to a widget's state.
    pub fn state_mut(&mut self, id: WidgetId) -> &mut WidgetState {
        self.states.entry(id).or_default()
    }

    /// Whether the widget accepts interaction.
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.state(id).enabled
    }

    /// Enable or disable a widget.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) {
        self.state_mut(id).enabled = enabled;
    }

    /// Set a checkable widget's toggle state.
    pub fn set_checked(&mut self, id: WidgetId, checked: bool) {
        self.state_mut(id).checked = checked;
    }

    /// Set a widget's displayed value.
    pub fn set_value(&mut self, id: WidgetId, value: impl Into<String>) {
        self.state_mut(id).value = Some(value.into());
    }

    /// Clear a widget's displayed value.
    pub fn clear_value(&mut self, id: WidgetId) {
        self.state_mut(id).value = None;
    }

    /// Set a widget's visual class.
    pub fn set_css_class(&mut self, id: WidgetId, class: impl Into<String>) {
        self.state_mut(id).css_class = Some(class.into());
    }

    /// Iterate over every widget that has been touched.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &WidgetState)> {
        self.states.iter().map(|(id, state)| (*id, state))
    }
}
