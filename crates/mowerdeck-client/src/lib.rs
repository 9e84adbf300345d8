//! # MowerDeck Client
//!
//! The HTTP channel to the remote mower device:
//!
//! - [`transport`] — the `DeviceTransport` seam and its reqwest-backed
//!   implementation (poll endpoint + `/api/<dotted.path>` write channel)
//! - [`scheduler`] — the periodic poll engine with free-running and
//!   self-rescheduling modes
//! - [`write_queue`] — the debounced, batched write queue for rapid edits
//! - [`commands`] — the catalogue of operator commands and their wire form

pub mod commands;
pub mod scheduler;
pub mod transport;
pub mod write_queue;

pub use commands::{CommandClient, DeviceCommand};
pub use scheduler::{PollScheduler, SchedulerConfig};
pub use transport::{DeviceTransport, FetchOutcome, HttpTransport, Verb};
pub use write_queue::DebouncedWriteQueue;
