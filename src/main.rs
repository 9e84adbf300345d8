use mowerdeck::{
    init_logging, AppEvent, ControlPane, DriverEvent, EventBus, EventCategory, EventFilter,
    FetchEvent, HttpTransport, MonitorPane, PollScheduler, SchedulerConfig,
};
use mowerdeck_client::DeviceTransport;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;

    let config = mowerdeck_settings::load_default()?;
    tracing::info!(
        "MowerDeck {} polling {} every {}ms",
        mowerdeck::VERSION,
        config.device.base_url,
        config.device.refresh_rate_ms
    );

    let bus = Arc::new(EventBus::new());
    let transport: Arc<dyn DeviceTransport> = Arc::new(HttpTransport::new(
        &config.device.base_url,
        &config.device.status_path,
        config.device.cache_buster,
    ));

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

    // Surface command rejections and fetch failures in the log
    bus.subscribe(
        EventFilter::Categories(vec![EventCategory::Command, EventCategory::Fetch]),
        |event| match &event {
            AppEvent::Command(_) => tracing::info!("{}", event.description()),
            AppEvent::Fetch(FetchEvent::FetchError { elapsed_ms }) => {
                tracing::warn!("Fetch failed after {:.0}ms", elapsed_ms);
            }
            _ => {}
        },
    );

    // Re-announce state-index changes as driver events for anything that
    // wants transitions rather than whole snapshots.
    {
        let bus = bus.clone();
        let mut rx = bus.receiver();
        tokio::spawn(async move {
            let mut last_index = None;
            while let Ok(event) = rx.recv().await {
                if let AppEvent::Fetch(FetchEvent::DataAvailable { snapshot, .. }) = event {
                    let index = snapshot.driver.state_index;
                    if index != last_index {
                        last_index = index;
                        if let Some(index) = index {
                            bus.publish(AppEvent::Driver(DriverEvent::StateChanged {
                                index,
                                state: snapshot.driver.state.clone(),
                            }));
                        }
                    }
                }
            }
        });
    }

    let scheduler = PollScheduler::new(
        transport,
        bus,
        SchedulerConfig {
            refresh_rate: Duration::from_millis(config.device.refresh_rate_ms),
            free_running: config.device.free_running,
        },
    );
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    scheduler.stop();

    Ok(())
}
