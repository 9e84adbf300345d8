//! # MowerDeck Core
//!
//! Core types, events, and telemetry model for MowerDeck.
//! Provides the fundamental abstractions shared by the polling client,
//! the widget panes, and the point editor:
//!
//! - Telemetry wire model (`Telemetry`, `Pose`, `Driver`, `Locator`)
//! - Typed capability sets replacing the legacy button bitmasks
//! - Event bus for fan-out of poll results and pane events
//! - Error taxonomy for transport, command, and validation failures

pub mod capability;
pub mod error;
pub mod event_bus;
pub mod telemetry;

pub use capability::{Capability, CapabilitySet};
pub use error::{CommandError, Error, Result, TransportError, ValidationError};
pub use event_bus::{
    event_bus, AppEvent, CommandEvent, DriverEvent, EditorEvent, EventBus, EventCategory,
    EventFilter, FetchEvent, SubscriptionId,
};
pub use telemetry::{Driver, Locator, Pose, Telemetry, TelemetrySnapshot};
