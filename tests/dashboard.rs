//! End-to-end wiring tests: a scripted transport feeds the scheduler, the
//! panes track the bus, and editor commits flow out through the write
//! queue, with no real network anywhere.

use async_trait::async_trait;
use mowerdeck::{
    AppEvent, Capability, ControlPane, DebouncedWriteQueue, DeviceTransport, EventBus,
    EventCategory, EventFilter, FetchEvent, FetchOutcome, MonitorPane, PointEditor,
    PointSet, PollScheduler, SchedulerConfig, TelemetrySnapshot, TransportError, Verb,
};
use mowerdeck_editor::model::PointEntity;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Serves a fixed snapshot and records every write.
struct ScriptedTransport {
    snapshot: TelemetrySnapshot,
    writes: Mutex<Vec<(Verb, String, String)>>,
}

impl ScriptedTransport {
    fn new(snapshot: TelemetrySnapshot) -> Self {
        Self {
            snapshot,
            writes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DeviceTransport for ScriptedTransport {
    async fn fetch_status(&self) -> Result<FetchOutcome, TransportError> {
        Ok(FetchOutcome::Data {
            snapshot: self.snapshot.clone(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
        })
    }

    async fn send(
        &self,
        verb: Verb,
        path: &str,
        value: Option<&str>,
    ) -> Result<String, TransportError> {
        self.writes.lock().push((
            verb,
            path.to_string(),
            value.unwrap_or_default().to_string(),
        ));
        Ok("1".to_string())
    }
}

fn route_driving_snapshot() -> TelemetrySnapshot {
    serde_json::from_str(
        r#"{
            "Telemetry": {"cutter1": 1, "cutter2": 0, "rssi": -69.0, "analogs": [900.0]},
            "Pose": {"c_x_m": 2.0, "c_y_m": 3.0, "t_deg": 45.0},
            "Driver": {"state": "Driving Route", "state-index": 2, "cur-mower": "mower-1",
                       "rot-speed": 45.0, "drv-speed": 70.0, "path": "Route"},
            "Locator": {"best_proj_found": true}
        }"#,
    )
    .expect("valid snapshot")
}

#[tokio::test]
async fn telemetry_flows_from_scheduler_to_panes() {
    let transport = Arc::new(ScriptedTransport::new(route_driving_snapshot()));
    let bus = Arc::new(EventBus::new());

    let control = Arc::new(Mutex::new(ControlPane::new()));
    let monitor = Arc::new(Mutex::new(MonitorPane::new()));
    {
        let control = control.clone();
        let monitor = monitor.clone();
        bus.subscribe(
            EventFilter::Categories(vec![EventCategory::Fetch]),
            move |event| {
                if let AppEvent::Fetch(FetchEvent::DataAvailable { snapshot, .. }) = event {
                    control.lock().apply_snapshot(&snapshot);
                    monitor.lock().apply_snapshot(&snapshot);
                }
            },
        );
    }

    let scheduler = PollScheduler::new(
        transport,
        bus,
        SchedulerConfig {
            refresh_rate: Duration::from_millis(10),
            free_running: false,
        },
    );
    scheduler.start();
    tokio::time::sleep(Duration::from_millis(60)).await;
    scheduler.stop();

    // Route-driving enablement from state index 2.
    let control = control.lock();
    assert!(control.is_enabled(Capability::Skip));
    assert!(control.is_enabled(Capability::Cancel));
    assert!(!control.is_enabled(Capability::Route));

    // Monitor derivations: -69 dBm sits in tier 3.
    let monitor = monitor.lock();
    assert_eq!(
        monitor
            .widgets()
            .state(mowerdeck::WidgetId::WifiStrength)
            .css_class
            .as_deref(),
        Some("wifi-3")
    );
    assert_eq!(
        monitor
            .widgets()
            .state(mowerdeck::WidgetId::Found)
            .css_class
            .as_deref(),
        Some("robot-found")
    );
}

#[tokio::test]
async fn editor_commits_flow_through_the_write_queue() {
    let transport = Arc::new(ScriptedTransport::new(TelemetrySnapshot::default()));
    let bus = Arc::new(EventBus::new());

    let mut set = PointSet::new();
    set.add_point(PointEntity::new(1, 1000.0, 1000.0, 60.0));
    set.add_point(PointEntity::new(2, 2000.0, 1000.0, 60.0));
    set.add_point(PointEntity::new(3, 1500.0, 2000.0, 60.0));
    let mut editor = PointEditor::new("fence", set);

    editor.select_all();
    assert!(editor.move_by(100.0, 0.0, false));

    let queue = DebouncedWriteQueue::with_delay(
        "lawn.fence",
        transport.clone(),
        bus,
        Duration::from_millis(10),
    );
    for (key, payload) in editor.take_pending_updates() {
        queue.enqueue(key, payload);
    }
    queue.flush_now().await;

    let writes = transport.writes.lock();
    let mut paths: Vec<&str> = writes.iter().map(|(_, p, _)| p.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["lawn.fence.1", "lawn.fence.2", "lawn.fence.3"]);
    assert!(writes.iter().all(|(verb, _, _)| *verb == Verb::Put));

    // Payloads carry the cartesian percent form.
    let (_, _, payload) = writes
        .iter()
        .find(|(_, p, _)| p == "lawn.fence.1")
        .expect("point 1 write");
    let value: serde_json::Value = serde_json::from_str(payload).unwrap();
    assert_eq!(value["index"], 1);
    assert!((value["x"].as_f64().unwrap() - 11.0).abs() < 1e-9);
    assert!((value["y"].as_f64().unwrap() - 90.0).abs() < 1e-9);
}
