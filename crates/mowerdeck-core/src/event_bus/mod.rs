//! # Event Bus Module
//!
//! Publish/subscribe fan-out decoupling the poll scheduler from the panes
//! that consume telemetry.
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter and receive events of interest
//! - Delivery is synchronous, in subscription order; a panicking handler
//!   never prevents delivery to the handlers after it
//! - An async broadcast side-channel is available for tokio tasks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mowerdeck_core::event_bus::{event_bus, AppEvent, FetchEvent, EventFilter, EventCategory};
//!
//! // Subscribe to fetch lifecycle events
//! let subscription = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Fetch]),
//!     |event| {
//!         if let AppEvent::Fetch(fetch) = event {
//!             println!("Fetch event: {:?}", fetch);
//!         }
//!     },
//! );
//!
//! // Publish an event
//! event_bus().publish(AppEvent::Fetch(FetchEvent::Paused));
//!
//! // Unsubscribe when done
//! event_bus().unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
