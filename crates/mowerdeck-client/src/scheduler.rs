//! Periodic poll engine.
//!
//! Fetches the status endpoint on a fixed cadence and fans the result out
//! on the event bus. Two modes:
//!
//! - **free-running**: a tick fires every `refresh_rate` regardless of
//!   completion; slow responses may overlap with the next fetch.
//! - **self-rescheduling** (default): fetch, await completion or failure,
//!   wait `refresh_rate`, fetch again — at most one in-flight poll.
//!
//! Failures never stop the engine and never change the cadence: a network
//! error becomes a `FetchError` event and the next cycle is scheduled at
//! the same constant interval. Pausing skips fetching (emitting `Paused`
//! in place of each skipped cycle) but never cancels an in-flight request;
//! a stale response is still delivered to all subscribers.

use crate::transport::{DeviceTransport, FetchOutcome};
use mowerdeck_core::{AppEvent, EventBus, FetchEvent};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Poll engine configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Interval between fetch cycles.
    pub refresh_rate: Duration,
    /// Fixed-cadence mode that permits overlapping polls.
    pub free_running: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_rate: Duration::from_millis(1000),
            free_running: false,
        }
    }
}

/// The periodic poll scheduler.
pub struct PollScheduler {
    transport: Arc<dyn DeviceTransport>,
    bus: Arc<EventBus>,
    config: SchedulerConfig,
    paused: Arc<AtomicBool>,
    kick: Arc<Notify>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl PollScheduler {
    /// Create a scheduler over the given transport and bus.
    pub fn new(
        transport: Arc<dyn DeviceTransport>,
        bus: Arc<EventBus>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            transport,
            bus,
            config,
            paused: Arc::new(AtomicBool::new(false)),
            kick: Arc::new(Notify::new()),
            handle: Mutex::new(None),
        }
    }

    /// Begin polling. The first fetch happens one interval after start,
    /// matching the cadence of subsequent cycles.
    pub fn start(&self) {
        let transport = self.transport.clone();
        let bus = self.bus.clone();
        let paused = self.paused.clone();
        let kick = self.kick.clone();
        let config = self.config.clone();

        let task = if config.free_running {
            tokio::spawn(run_free_running(transport, bus, paused, kick, config))
        } else {
            tokio::spawn(run_rescheduling(transport, bus, paused, kick, config))
        };

        let mut handle = self.handle.lock();
        if let Some(old) = handle.replace(task) {
            old.abort();
        }
    }

    /// Stop polling. In-flight requests are not cancelled by pausing, but
    /// stopping aborts the loop task outright.
    pub fn stop(&self) {
        if let Some(task) = self.handle.lock().take() {
            task.abort();
        }
    }

    /// Skip fetching on subsequent cycles, emitting `Paused` instead.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resume fetching on subsequent cycles.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    /// Whether the scheduler is currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Cancel the pending timer, fetch immediately, then resume the normal
    /// cadence. Never cancels an in-flight request.
    pub fn force_refresh(&self) {
        self.kick.notify_one();
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Self-rescheduling loop: each cycle awaits completion before the next
/// interval starts, so at most one poll is ever in flight.
async fn run_rescheduling(
    transport: Arc<dyn DeviceTransport>,
    bus: Arc<EventBus>,
    paused: Arc<AtomicBool>,
    kick: Arc<Notify>,
    config: SchedulerConfig,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(config.refresh_rate) => {}
            _ = kick.notified() => {}
        }
        if paused.load(Ordering::SeqCst) {
            bus.publish(AppEvent::Fetch(FetchEvent::Paused));
            continue;
        }
        fetch_once(transport.as_ref(), &bus).await;
    }
}

/// Free-running loop: ticks at a fixed cadence and spawns each fetch
/// without awaiting it, so polls may overlap. A forced refresh fetches
/// immediately without disturbing the cadence.
async fn run_free_running(
    transport: Arc<dyn DeviceTransport>,
    bus: Arc<EventBus>,
    paused: Arc<AtomicBool>,
    kick: Arc<Notify>,
    config: SchedulerConfig,
) {
    let mut next = tokio::time::Instant::now() + config.refresh_rate;
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(next) => {
                next += config.refresh_rate;
            }
            _ = kick.notified() => {}
        }
        if paused.load(Ordering::SeqCst) {
            bus.publish(AppEvent::Fetch(FetchEvent::Paused));
            continue;
        }
        let transport = transport.clone();
        let bus = bus.clone();
        tokio::spawn(async move {
            fetch_once(transport.as_ref(), &bus).await;
        });
    }
}

/// One fetch cycle: emit `PreFetch`, poll, translate the outcome into
/// events. Transport failures become `FetchError` and are otherwise
/// swallowed; the caller schedules the next cycle regardless.
async fn fetch_once(transport: &dyn DeviceTransport, bus: &EventBus) {
    bus.publish(AppEvent::Fetch(FetchEvent::PreFetch));
    let start = Instant::now();

    match transport.fetch_status().await {
        Ok(outcome) => {
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            let headers = match outcome {
                FetchOutcome::Data { snapshot, headers } => {
                    bus.publish(AppEvent::Fetch(FetchEvent::DataAvailable {
                        snapshot,
                        elapsed_ms,
                    }));
                    headers
                }
                FetchOutcome::Empty { headers } => {
                    bus.publish(AppEvent::Fetch(FetchEvent::DataEmpty { elapsed_ms }));
                    headers
                }
                FetchOutcome::NoContent { headers } => {
                    bus.publish(AppEvent::Fetch(FetchEvent::NoContent { elapsed_ms }));
                    headers
                }
                FetchOutcome::HttpError { status, headers } => {
                    bus.publish(AppEvent::Fetch(FetchEvent::HttpError { status, elapsed_ms }));
                    headers
                }
            };
            bus.publish(AppEvent::Fetch(FetchEvent::HeadersAvailable {
                headers,
                elapsed_ms,
            }));
        }
        Err(err) => {
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            tracing::warn!("Poll failed after {:.0}ms: {}", elapsed_ms, err);
            bus.publish(AppEvent::Fetch(FetchEvent::FetchError { elapsed_ms }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Verb;
    use async_trait::async_trait;
    use mowerdeck_core::{telemetry::TelemetrySnapshot, TransportError};
    use std::sync::atomic::AtomicUsize;

    /// Transport stub with configurable latency and failure behavior.
    struct MockTransport {
        fail: bool,
        latency: Duration,
        fetches: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockTransport {
        fn new(fail: bool, latency: Duration) -> Self {
            Self {
                fail,
                latency,
                fetches: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DeviceTransport for MockTransport {
        async fn fetch_status(&self) -> Result<FetchOutcome, TransportError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.latency).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.fail {
                Err(TransportError::Network {
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(FetchOutcome::Data {
                    snapshot: TelemetrySnapshot::default(),
                    headers: vec![("content-type".to_string(), "application/json".to_string())],
                })
            }
        }

        async fn send(
            &self,
            _verb: Verb,
            _path: &str,
            _value: Option<&str>,
        ) -> Result<String, TransportError> {
            Ok("1".to_string())
        }
    }

    fn scheduler(
        transport: Arc<MockTransport>,
        bus: Arc<EventBus>,
        rate_ms: u64,
        free_running: bool,
    ) -> PollScheduler {
        PollScheduler::new(
            transport,
            bus,
            SchedulerConfig {
                refresh_rate: Duration::from_millis(rate_ms),
                free_running,
            },
        )
    }

    #[tokio::test]
    async fn test_constant_interval_after_fetch_error() {
        let transport = Arc::new(MockTransport::new(true, Duration::ZERO));
        let bus = Arc::new(EventBus::new());
        let errors = Arc::new(AtomicUsize::new(0));
        let successes = Arc::new(AtomicUsize::new(0));

        let errors_clone = errors.clone();
        let successes_clone = successes.clone();
        bus.subscribe(mowerdeck_core::EventFilter::All, move |event| {
            match event {
                AppEvent::Fetch(FetchEvent::FetchError { .. }) => {
                    errors_clone.fetch_add(1, Ordering::SeqCst);
                }
                AppEvent::Fetch(FetchEvent::DataAvailable { .. }) => {
                    successes_clone.fetch_add(1, Ordering::SeqCst);
                }
                _ => {}
            }
        });

        let sched = scheduler(transport.clone(), bus, 20, false);
        sched.start();
        tokio::time::sleep(Duration::from_millis(110)).await;
        sched.stop();

        // A failing endpoint keeps being polled at the same cadence:
        // roughly one error per interval, no backoff, no stop.
        let errors = errors.load(Ordering::SeqCst);
        assert!(
            (3..=6).contains(&errors),
            "expected steady cadence, got {errors} errors"
        );
        assert_eq!(successes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rescheduling_mode_never_overlaps() {
        // Latency far above the refresh rate: in self-rescheduling mode the
        // interval runs completion-to-start, so polls still never overlap.
        let transport = Arc::new(MockTransport::new(false, Duration::from_millis(30)));
        let bus = Arc::new(EventBus::new());
        let sched = scheduler(transport.clone(), bus, 5, false);
        sched.start();
        tokio::time::sleep(Duration::from_millis(150)).await;
        sched.stop();

        assert_eq!(transport.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(transport.fetches.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_free_running_mode_allows_overlap() {
        let transport = Arc::new(MockTransport::new(false, Duration::from_millis(60)));
        let bus = Arc::new(EventBus::new());
        let sched = scheduler(transport.clone(), bus, 10, true);
        sched.start();
        tokio::time::sleep(Duration::from_millis(150)).await;
        sched.stop();

        assert!(transport.max_in_flight.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_pause_emits_paused_and_skips_fetch() {
        let transport = Arc::new(MockTransport::new(false, Duration::ZERO));
        let bus = Arc::new(EventBus::new());
        let paused_events = Arc::new(AtomicUsize::new(0));

        let paused_clone = paused_events.clone();
        bus.subscribe(mowerdeck_core::EventFilter::All, move |event| {
            if matches!(event, AppEvent::Fetch(FetchEvent::Paused)) {
                paused_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        let sched = scheduler(transport.clone(), bus, 15, false);
        sched.pause();
        sched.start();
        tokio::time::sleep(Duration::from_millis(80)).await;
        sched.stop();

        assert_eq!(transport.fetches.load(Ordering::SeqCst), 0);
        assert!(paused_events.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_force_refresh_fetches_immediately() {
        let transport = Arc::new(MockTransport::new(false, Duration::ZERO));
        let bus = Arc::new(EventBus::new());
        // Long interval: without the kick, no fetch would happen in time.
        let sched = scheduler(transport.clone(), bus, 10_000, false);
        sched.start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(transport.fetches.load(Ordering::SeqCst), 0);

        sched.force_refresh();
        tokio::time::sleep(Duration::from_millis(30)).await;
        sched.stop();

        assert_eq!(transport.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_resume_restores_fetching() {
        let transport = Arc::new(MockTransport::new(false, Duration::ZERO));
        let bus = Arc::new(EventBus::new());
        let sched = scheduler(transport.clone(), bus, 10, false);
        sched.pause();
        sched.start();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(transport.fetches.load(Ordering::SeqCst), 0);

        sched.resume();
        tokio::time::sleep(Duration::from_millis(40)).await;
        sched.stop();
        assert!(transport.fetches.load(Ordering::SeqCst) >= 1);
    }
}
