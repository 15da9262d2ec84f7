//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod device_control;
pub mod scenario_repo;
pub mod sensor_repo;
pub mod snapshot_publisher;
pub mod telemetry_publisher;

pub use device_control::DeviceControl;
pub use scenario_repo::ScenarioRepository;
pub use sensor_repo::SensorRepository;
pub use snapshot_publisher::SnapshotPublisher;
pub use telemetry_publisher::TelemetryPublisher;
