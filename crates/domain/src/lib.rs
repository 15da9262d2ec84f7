//! # smarthub-domain
//!
//! Pure domain model for the smarthub telemetry and scenario engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Sensor readings** (typed payloads emitted by one sensor at one instant)
//! - Define **Hub snapshots** (the latest accepted reading of every sensor of a hub)
//!   together with the merge rule that folds a reading into a snapshot
//! - Define **Scenarios** (conditions over sensor values → device actions)
//!   together with the condition evaluation rules
//! - Define **Hub events** (topology changes: devices and scenarios added/removed)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod hub_event;
pub mod scenario;
pub mod sensor;
pub mod snapshot;
