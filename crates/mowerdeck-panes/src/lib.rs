//! # MowerDeck Panes
//!
//! The two telemetry-driven panes of the dashboard, modelled as plain
//! data with no rendering dependency:
//!
//! - [`control`] — maps the driver state index to widget enablement and
//!   turns operator interactions into device commands
//! - [`monitor`] — wifi/battery/pose/locator readouts derived from the
//!   latest snapshot
//! - [`widgets`] — the logical widget registry both panes update
//!
//! A render layer consumes the registry; the panes never touch a screen.

pub mod control;
pub mod monitor;
pub mod widgets;

pub use control::ControlPane;
pub use monitor::{BatteryLevel, MonitorPane, WifiTier};
pub use widgets::{WidgetId, WidgetPane, WidgetState};
