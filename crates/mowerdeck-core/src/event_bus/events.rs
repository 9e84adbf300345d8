//! Event type definitions for the event bus.
//!
//! Events are organized by category and designed to be cloneable and
//! serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetrySnapshot;

/// Root event enum for all dashboard events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Poll fetch lifecycle
    Fetch(FetchEvent),
    /// Driver/navigation state
    Driver(DriverEvent),
    /// Device command channel
    Command(CommandEvent),
    /// Point editor
    Editor(EditorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Fetch(_) => EventCategory::Fetch,
            AppEvent::Driver(_) => EventCategory::Driver,
            AppEvent::Command(_) => EventCategory::Command,
            AppEvent::Editor(_) => EventCategory::Editor,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Fetch(e) => e.description(),
            AppEvent::Driver(e) => e.description(),
            AppEvent::Command(e) => e.description(),
            AppEvent::Editor(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Poll fetch lifecycle events.
    Fetch,
    /// Driver/navigation state events.
    Driver,
    /// Device command channel events.
    Command,
    /// Point editor events.
    Editor,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Fetch => write!(f, "Fetch"),
            EventCategory::Driver => write!(f, "Driver"),
            EventCategory::Command => write!(f, "Command"),
            EventCategory::Editor => write!(f, "Editor"),
        }
    }
}

/// Poll fetch lifecycle events.
///
/// One fetch attempt emits `PreFetch`, then exactly one of the outcome
/// events, then `HeadersAvailable` when a response arrived at all. Elapsed
/// times are measured from just before the request was issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FetchEvent {
    /// About to issue a fetch.
    PreFetch,
    /// A body arrived and decoded.
    DataAvailable {
        /// The decoded snapshot.
        snapshot: TelemetrySnapshot,
        /// Round-trip time in milliseconds.
        elapsed_ms: f64,
    },
    /// A 2xx response with a zero-length body.
    DataEmpty {
        /// Round-trip time in milliseconds.
        elapsed_ms: f64,
    },
    /// Explicit empty-success (HTTP 204).
    NoContent {
        /// Round-trip time in milliseconds.
        elapsed_ms: f64,
    },
    /// A non-2xx response.
    HttpError {
        /// The HTTP status code.
        status: u16,
        /// Round-trip time in milliseconds.
        elapsed_ms: f64,
    },
    /// The request threw or the body failed to decode.
    FetchError {
        /// Round-trip time in milliseconds.
        elapsed_ms: f64,
    },
    /// Response headers, emitted alongside any outcome with a response.
    HeadersAvailable {
        /// Header name/value pairs.
        headers: Vec<(String, String)>,
        /// Round-trip time in milliseconds.
        elapsed_ms: f64,
    },
    /// A cycle fired while the scheduler was paused; no fetch was made.
    Paused,
}

impl FetchEvent {
    fn description(&self) -> String {
        match self {
            FetchEvent::PreFetch => "Fetch starting".to_string(),
            FetchEvent::DataAvailable { elapsed_ms, .. } => {
                format!("Data available ({elapsed_ms:.0}ms)")
            }
            FetchEvent::DataEmpty { elapsed_ms } => format!("Empty body ({elapsed_ms:.0}ms)"),
            FetchEvent::NoContent { elapsed_ms } => format!("No content ({elapsed_ms:.0}ms)"),
            FetchEvent::HttpError { status, elapsed_ms } => {
                format!("HTTP {status} ({elapsed_ms:.0}ms)")
            }
            FetchEvent::FetchError { elapsed_ms } => format!("Fetch error ({elapsed_ms:.0}ms)"),
            FetchEvent::HeadersAvailable { headers, .. } => {
                format!("Headers available ({} entries)", headers.len())
            }
            FetchEvent::Paused => "Paused".to_string(),
        }
    }
}

/// Driver/navigation state events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DriverEvent {
    /// The reported state index changed.
    StateChanged {
        /// The new state index.
        index: u8,
        /// Human-readable navigation state, when reported.
        state: Option<String>,
    },
    /// The list of known mowers changed.
    MowerListChanged {
        /// Current mower names, in server order.
        mowers: Vec<String>,
    },
}

impl DriverEvent {
    fn description(&self) -> String {
        match self {
            DriverEvent::StateChanged { index, state } => match state {
                Some(s) => format!("Driver state {index} ({s})"),
                None => format!("Driver state {index}"),
            },
            DriverEvent::MowerListChanged { mowers } => {
                format!("Mower list changed ({} mowers)", mowers.len())
            }
        }
    }
}

/// Device command channel events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CommandEvent {
    /// A command write was issued.
    Sent {
        /// Dotted command path.
        path: String,
    },
    /// The device acknowledged the command.
    Acknowledged {
        /// Dotted command path.
        path: String,
    },
    /// The device answered with an error message.
    Failed {
        /// Dotted command path.
        path: String,
        /// Operator-facing message from the device.
        message: String,
    },
}

impl CommandEvent {
    fn description(&self) -> String {
        match self {
            CommandEvent::Sent { path } => format!("Command sent: {path}"),
            CommandEvent::Acknowledged { path } => format!("Command acknowledged: {path}"),
            CommandEvent::Failed { path, message } => {
                format!("Command failed: {path}: {message}")
            }
        }
    }
}

/// Point editor events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditorEvent {
    /// The selection changed.
    SelectionChanged {
        /// Number of selected points.
        selected: usize,
        /// Total selectable points.
        total: usize,
    },
    /// A batch of moves committed.
    MovesCommitted {
        /// Number of points that moved.
        count: usize,
    },
    /// Geometry was reloaded from the server.
    GeometryReloaded,
}

impl EditorEvent {
    fn description(&self) -> String {
        match self {
            EditorEvent::SelectionChanged { selected, total } => {
                format!("Selection {selected}/{total}")
            }
            EditorEvent::MovesCommitted { count } => format!("{count} points moved"),
            EditorEvent::GeometryReloaded => "Geometry reloaded".to_string(),
        }
    }
}
