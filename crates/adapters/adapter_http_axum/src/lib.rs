//! # smarthub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept sensor readings and hub events over HTTP, validate them, and
//!   forward them onto the broker through the `TelemetryPublisher` port
//! - Serve read-only JSON views of the pipeline state: hub snapshots, the
//!   scenario directory and the sensor roster
//! - Map application errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `smarthub-app` (for port traits and services) and
//! `smarthub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;
