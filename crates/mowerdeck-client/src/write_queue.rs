//! Debounced write batching.
//!
//! Rapid edits (nudging a point ten times in a second) would otherwise
//! produce a PUT per keystroke. The queue coalesces writes per key and
//! flushes the whole batch once the input has been quiet for the debounce
//! interval. Only the latest payload per key survives coalescing.
//!
//! The flush snapshots and clears the pending map in a single lock before
//! any network work, so edits made while a flush is in progress start a
//! fresh batch and are never lost or double-sent. Entries within a batch
//! are sent independently: one rejected write does not stop the rest.

use crate::transport::{is_ack, DeviceTransport, Verb};
use mowerdeck_core::{AppEvent, CommandEvent, EventBus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Debounce interval used when none is configured.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Coalesces keyed writes and flushes them after a quiet period.
pub struct DebouncedWriteQueue {
    /// Base dotted path for indexed keys, e.g. `lawn.fence`.
    name: String,
    delay: Duration,
    transport: Arc<dyn DeviceTransport>,
    bus: Arc<EventBus>,
    pending: Arc<Mutex<HashMap<String, String>>>,
    /// Timer generation. Each enqueue retires earlier timers by bumping
    /// this; a sleeping timer flushes only if it is still the newest when
    /// it wakes. A flush that has begun is never cancelled.
    generation: Arc<AtomicU64>,
}

impl DebouncedWriteQueue {
    /// Create a queue writing under `name` with the default debounce.
    pub fn new(
        name: impl Into<String>,
        transport: Arc<dyn DeviceTransport>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self::with_delay(name, transport, bus, DEFAULT_DEBOUNCE)
    }

    /// Create a queue with an explicit debounce interval.
    pub fn with_delay(
        name: impl Into<String>,
        transport: Arc<dyn DeviceTransport>,
        bus: Arc<EventBus>,
        delay: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            delay,
            transport,
            bus,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stage a write, replacing any pending payload under the same key,
    /// and restart the quiet-period timer. Returns the number of keys
    /// currently pending.
    pub fn enqueue(&self, key: impl Into<String>, payload: impl Into<String>) -> usize {
        let count = {
            let mut pending = self.pending.lock();
            pending.insert(key.into(), payload.into());
            pending.len()
        };

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = self.generation.clone();
        let name = self.name.clone();
        let transport = self.transport.clone();
        let bus = self.bus.clone();
        let pending = self.pending.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // A later edit or an explicit flush retired this timer.
            if generation.load(Ordering::SeqCst) != ticket {
                return;
            }
            flush(&name, transport.as_ref(), &bus, &pending).await;
        });

        count
    }

    /// Retire the pending timer and flush everything staged right now.
    pub async fn flush_now(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        flush(&self.name, self.transport.as_ref(), &self.bus, &self.pending).await;
    }

    /// Number of keys staged and not yet flushed.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Drop for DebouncedWriteQueue {
    fn drop(&mut self) {
        // Retire any sleeping timer; an in-progress flush runs to the end.
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Wire path for a staged key: a trailing numeric suffix indexes into the
/// queue's collection (`fence12` writes `lawn.fence.12`); anything else is
/// taken as a full dotted path already.
fn path_for_key(name: &str, key: &str) -> String {
    let digits = key.len() - key.chars().rev().take_while(|c| c.is_ascii_digit()).count();
    if digits < key.len() {
        format!("{}.{}", name, &key[digits..])
    } else {
        key.to_string()
    }
}

async fn flush(
    name: &str,
    transport: &dyn DeviceTransport,
    bus: &EventBus,
    pending: &Mutex<HashMap<String, String>>,
) {
    // Snapshot and clear atomically so concurrent enqueues land in the
    // next batch rather than being dropped or sent twice.
    let batch = std::mem::take(&mut *pending.lock());
    if batch.is_empty() {
        return;
    }
    tracing::debug!("Flushing {} staged write(s) for {}", batch.len(), name);

    for (key, payload) in batch {
        let path = path_for_key(name, &key);
        bus.publish(AppEvent::Command(CommandEvent::Sent {
            path: path.clone(),
        }));
        match transport.send(Verb::Put, &path, Some(&payload)).await {
            Ok(body) if is_ack(&body) => {
                bus.publish(AppEvent::Command(CommandEvent::Acknowledged { path }));
            }
            Ok(body) => {
                tracing::warn!("Write to {} rejected: {}", path, body);
                bus.publish(AppEvent::Command(CommandEvent::Failed {
                    path,
                    message: body,
                }));
            }
            Err(err) => {
                tracing::warn!("Write to {} failed: {}", path, err);
                bus.publish(AppEvent::Command(CommandEvent::Failed {
                    path,
                    message: err.to_string(),
                }));
            }
        }
    }
}
