//! # smarthub-adapter-mqtt
//!
//! MQTT adapter — the message-broker transport of smarthub.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and keep the subscriptions alive across reconnects
//! - Decode `{base}/sensors` and `{base}/hubs` messages into wire envelopes
//!   and hand them to the pipeline channels
//! - Publish accepted hub snapshots to `{base}/snapshots/{hub_id}`
//! - Publish events ingested over HTTP onto the inbound topics
//!
//! ## Dependency rule
//! Same as other adapters: depends on `smarthub-app` and `smarthub-domain`.

mod bridge;
mod config;
mod error;
mod topics;

pub use bridge::{MqttBridge, MqttEventLoop};
pub use config::MqttConfig;
pub use error::MqttError;
pub use topics::{Inbound, Topics};
