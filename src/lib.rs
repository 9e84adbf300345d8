//! # MowerDeck
//!
//! A control dashboard engine for robotic lawnmowers: polls the mower
//! server's telemetry endpoint, synchronizes operator widgets with the
//! reported driver state, and edits boundary/route geometry over HTTP.
//!
//! ## Architecture
//!
//! MowerDeck is organized as a workspace with multiple crates:
//!
//! 1. **mowerdeck-core** - Telemetry model, capability sets, event bus, errors
//! 2. **mowerdeck-client** - HTTP transport, poll scheduler, write queue, commands
//! 3. **mowerdeck-panes** - Control and monitor panes over a logical widget registry
//! 4. **mowerdeck-editor** - Point editor engine and coordinate transforms
//! 5. **mowerdeck-settings** - TOML configuration
//! 6. **mowerdeck** - Main binary that wires the crates together

pub use mowerdeck_core::{
    event_bus, AppEvent, Capability, CapabilitySet, CommandError, CommandEvent, DriverEvent,
    EditorEvent, Error, EventBus, EventCategory, EventFilter, FetchEvent, Result,
    SubscriptionId, TelemetrySnapshot, TransportError, ValidationError,
};

pub use mowerdeck_client::{
    CommandClient, DebouncedWriteQueue, DeviceCommand, DeviceTransport, FetchOutcome,
    HttpTransport, PollScheduler, SchedulerConfig, Verb,
};

pub use mowerdeck_editor::{PointEditor, PointSet};
pub use mowerdeck_panes::{ControlPane, MonitorPane, WidgetId, WidgetPane};
pub use mowerdeck_settings::DashboardConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
