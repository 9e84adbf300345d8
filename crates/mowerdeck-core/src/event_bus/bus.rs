//! Event Bus implementation.
//!
//! Provides the core EventBus struct and global instance for
//! application-wide event distribution.

use parking_lot::RwLock;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{AppEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &AppEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(AppEvent) + Send + Sync>;

/// Central event bus for application-wide event distribution
///
/// Handlers are stored in subscription order and invoked in that order on
/// the publishing thread. There is no replay: a subscriber only sees events
/// published after it subscribed.
pub struct EventBus {
    /// Broadcast channel sender for async receivers
    sender: broadcast::Sender<AppEvent>,
    /// Registered synchronous handlers, in subscription order
    handlers: Arc<RwLock<Vec<(SubscriptionId, EventFilter, EventHandler)>>>,
}

impl EventBus {
    /// Channel capacity for the async broadcast side.
    const CHANNEL_CAPACITY: usize = 1024;

    /// Create a new event bus
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CHANNEL_CAPACITY);
        Self {
            sender,
            handlers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Synchronous handlers run first, in subscription order. A panicking
    /// handler is logged and skipped; the remaining handlers still run.
    /// Returns the number of async receivers the event was forwarded to.
    pub fn publish(&self, event: AppEvent) -> usize {
        let handlers = self.handlers.read();
        for (id, filter, handler) in handlers.iter() {
            if filter.matches(&event) {
                let outcome = catch_unwind(AssertUnwindSafe(|| handler(event.clone())));
                if outcome.is_err() {
                    tracing::warn!("Event handler {} panicked on {}", id, event.description());
                }
            }
        }

        // Forward to async receivers; no receivers is not an error
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler will be called on the publishing thread, so it should
    /// return quickly to avoid blocking event dispatch.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let mut handlers = self.handlers.write();
        handlers.push((id, filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for manual event polling
    ///
    /// Useful for async contexts that want to receive events in a tokio
    /// task instead of a synchronous handler.
    pub fn receiver(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(sub_id, _, _)| *sub_id != id);
        let removed = handlers.len() < before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Global event bus instance
static EVENT_BUS: OnceLock<EventBus> = OnceLock::new();

/// Get or initialize the global event bus
pub fn event_bus() -> &'static EventBus {
    EVENT_BUS.get_or_init(EventBus::new)
}

/// Convenience macro to publish an event to the global event bus
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::event_bus::event_bus().publish($event)
    };
}
