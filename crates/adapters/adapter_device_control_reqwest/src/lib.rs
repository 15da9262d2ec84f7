//! # smarthub-adapter-device-control-reqwest
//!
//! HTTP client for the device-control endpoint.
//!
//! ## Responsibilities
//! - Implement the `DeviceControl` port from `smarthub-app::ports`
//! - `POST {base_url}/hubs/{hub_id}/actions` with a JSON `DeviceActionRequest`
//! - Map transport failures and non-2xx answers into domain errors
//!
//! ## Dependency rule
//! Same as other adapters: depends on `smarthub-app` and `smarthub-domain`.

mod client;
mod config;
mod error;

pub use client::HttpDeviceControl;
pub use config::DeviceControlConfig;
pub use error::DeviceControlError;
