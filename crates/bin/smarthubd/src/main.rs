//! # smarthubd — smarthub daemon
//!
//! Composition root that wires all adapters together and starts the
//! pipeline and the HTTP server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository, broker and device-control adapters
//! - Spawn the aggregator, evaluator, hub event and broker loops
//! - Build the axum router and serve it
//! - Handle graceful shutdown (SIGTERM/SIGINT): stop the broker loop, let
//!   every downstream loop drain its channel, then exit
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing_subscriber::EnvFilter;

use smarthub_adapter_device_control_reqwest::HttpDeviceControl;
use smarthub_adapter_http_axum::state::AppState;
use smarthub_adapter_mqtt::MqttBridge;
use smarthub_adapter_storage_sqlite_sqlx::{SqliteScenarioRepository, SqliteSensorRepository};
use smarthub_app::aggregator::SnapshotAggregator;
use smarthub_app::dispatcher::ActionDispatcher;
use smarthub_app::evaluator::ScenarioEvaluator;
use smarthub_app::event_bus::InProcessSnapshotBus;
use smarthub_app::ports::SnapshotPublisher;
use smarthub_app::services::hub_event_service::HubEventService;
use smarthub_app::snapshot_store::SnapshotStore;
use smarthub_domain::snapshot::HubSnapshot;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = smarthub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Broker and device control
    let (bridge, mqtt_loop) = MqttBridge::new(&config.mqtt);
    let bridge = Arc::new(bridge);
    let device_control = HttpDeviceControl::new(&config.device_control)?;

    // Pipeline
    let snapshots = Arc::new(SnapshotStore::new());
    let bus = Arc::new(InProcessSnapshotBus::new(
        config.pipeline.snapshot_bus_capacity,
    ));
    let evaluator_rx = bus.subscribe();
    let forwarder_rx = bus.subscribe();

    let aggregator = SnapshotAggregator::new(Arc::clone(&snapshots), bus);
    let dispatcher =
        ActionDispatcher::new(device_control).with_timeout(config.pipeline.dispatch_timeout());
    let evaluator = ScenarioEvaluator::new(SqliteScenarioRepository::new(pool.clone()), dispatcher);
    let hub_events = Arc::new(HubEventService::new(
        SqliteScenarioRepository::new(pool.clone()),
        SqliteSensorRepository::new(pool),
    ));

    let (sensor_tx, sensor_rx) = mpsc::channel(config.pipeline.sensor_channel_capacity);
    let (hub_tx, hub_rx) = mpsc::channel(config.pipeline.hub_channel_capacity);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    // The broker loop owns the only senders: once it stops, the aggregator
    // and hub loops drain and end, which drops the bus and ends the
    // evaluator and forwarder.
    let tasks = [
        tokio::spawn(mqtt_loop.run(sensor_tx, hub_tx, async move {
            let _ = stop_rx.await;
        })),
        tokio::spawn(async move { aggregator.run(sensor_rx).await }),
        tokio::spawn({
            let hub_events = Arc::clone(&hub_events);
            async move { hub_events.run(hub_rx).await }
        }),
        tokio::spawn(async move { evaluator.run(evaluator_rx).await }),
        tokio::spawn(forward_snapshots(forwarder_rx, Arc::clone(&bridge))),
    ];

    // HTTP
    let state = AppState::new(hub_events, snapshots, bridge);
    let app = smarthub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "smarthubd listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down pipeline");
    let _ = stop_tx.send(());
    for task in tasks {
        if let Err(err) = task.await {
            tracing::error!(error = %err, "pipeline task failed");
        }
    }
    tracing::info!("smarthubd stopped");
    Ok(())
}

/// Relay every snapshot of the in-process stream onto the broker.
async fn forward_snapshots<P: SnapshotPublisher>(
    mut receiver: broadcast::Receiver<Arc<HubSnapshot>>,
    publisher: P,
) {
    loop {
        match receiver.recv().await {
            Ok(snapshot) => {
                let hub_id = snapshot.hub_id.clone();
                if let Err(err) = publisher.publish(snapshot).await {
                    tracing::warn!(%hub_id, error = %err.chain(), "failed to forward snapshot");
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "snapshot forwarder lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::info!("snapshot forwarder stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
