//! # smarthub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ScenarioRepository`: the scenario directory of each hub
//!   - `SensorRepository`: the sensor roster of each hub
//!   - `SnapshotPublisher`: the outbound hub snapshot stream
//!   - `DeviceControl`: the device-control endpoint
//!   - `TelemetryPublisher`: puts ingested events onto the broker
//! - Provide the processing pipeline:
//!   - `SnapshotStore`: owns one snapshot per hub, serialises merges per hub
//!   - `SnapshotAggregator`: sensor readings → snapshots
//!   - `ScenarioEvaluator`: snapshots → satisfied scenarios
//!   - `ActionDispatcher`: satisfied scenarios → device-control calls
//!   - `HubEventService`: applies hub topology events to the repositories
//! - Provide **in-process infrastructure** (snapshot bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `smarthub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod aggregator;
pub mod dispatcher;
pub mod evaluator;
pub mod event_bus;
pub mod ports;
pub mod services;
pub mod snapshot_store;
