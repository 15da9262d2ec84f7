//! Broker connection: the publishing half ([`MqttBridge`]) and the polling
//! half ([`MqttEventLoop`]).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Packet, QoS};
use serde::Serialize;
use tokio::sync::mpsc;

use smarthub_app::ports::{SnapshotPublisher, TelemetryPublisher};
use smarthub_domain::error::{ErrorChain, SmartHubError};
use smarthub_domain::hub_event::{HubEvent, HubEventEnvelope};
use smarthub_domain::sensor::{SensorEvent, SensorEventEnvelope};
use smarthub_domain::snapshot::HubSnapshot;

use crate::config::MqttConfig;
use crate::error::MqttError;
use crate::topics::{Inbound, Topics};

/// Publishing handle to the broker. Cheap to share behind an `Arc`.
pub struct MqttBridge {
    client: AsyncClient,
    topics: Topics,
}

/// Drives the broker connection and feeds inbound messages to the pipeline.
pub struct MqttEventLoop {
    client: AsyncClient,
    eventloop: EventLoop,
    topics: Topics,
    reconnect_delay: Duration,
}

impl MqttBridge {
    /// Create the client. Nothing is sent before the returned event loop is
    /// polled.
    #[must_use]
    pub fn new(config: &MqttConfig) -> (Self, MqttEventLoop) {
        let (client, eventloop) = AsyncClient::new(config.options(), config.request_capacity);
        let topics = Topics::new(&config.base_topic);
        let bridge = Self {
            client: client.clone(),
            topics: topics.clone(),
        };
        let event_loop = MqttEventLoop {
            client,
            eventloop,
            topics,
            reconnect_delay: config.reconnect_delay(),
        };
        (bridge, event_loop)
    }

    async fn send(&self, topic: String, payload: Vec<u8>) -> Result<(), MqttError> {
        self.client
            .publish(topic, QoS::AtLeastOnce, false, payload)
            .await?;
        Ok(())
    }
}

fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, MqttError> {
    serde_json::to_vec(message).map_err(MqttError::PayloadEncode)
}

impl SnapshotPublisher for MqttBridge {
    async fn publish(&self, snapshot: Arc<HubSnapshot>) -> Result<(), SmartHubError> {
        let topic = self.topics.snapshot(&snapshot.hub_id);
        let payload = encode(snapshot.as_ref())?;
        self.send(topic, payload).await?;
        Ok(())
    }
}

impl TelemetryPublisher for MqttBridge {
    async fn publish_sensor_event(&self, event: SensorEvent) -> Result<(), SmartHubError> {
        let payload = encode(&SensorEventEnvelope::from(event))?;
        self.send(self.topics.sensors(), payload).await?;
        Ok(())
    }

    async fn publish_hub_event(&self, event: HubEvent) -> Result<(), SmartHubError> {
        let payload = encode(&HubEventEnvelope::from(event))?;
        self.send(self.topics.hubs(), payload).await?;
        Ok(())
    }
}

impl MqttEventLoop {
    /// Poll the broker until `shutdown` resolves or the pipeline stops
    /// listening.
    ///
    /// Subscriptions are (re)issued on every `ConnAck`, so they survive
    /// reconnects. Connection errors are logged and polling resumes after
    /// the configured delay.
    pub async fn run(
        mut self,
        sensors: mpsc::Sender<SensorEventEnvelope>,
        hubs: mpsc::Sender<HubEventEnvelope>,
        shutdown: impl Future<Output = ()>,
    ) {
        tokio::pin!(shutdown);
        loop {
            let event = tokio::select! {
                () = &mut shutdown => break,
                event = self.eventloop.poll() => event,
            };
            match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    tracing::info!("connected to MQTT broker");
                    self.subscribe();
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if !route(&self.topics, &publish.topic, &publish.payload, &sensors, &hubs).await
                    {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "MQTT connection error, retrying");
                    tokio::time::sleep(self.reconnect_delay).await;
                }
            }
        }
        if let Err(err) = self.client.try_disconnect() {
            tracing::debug!(error = %err, "MQTT disconnect not sent");
        }
        tracing::info!("MQTT event loop stopped");
    }

    fn subscribe(&self) {
        for topic in [self.topics.sensors(), self.topics.hubs()] {
            if let Err(err) = self.client.try_subscribe(topic.as_str(), QoS::AtLeastOnce) {
                tracing::error!(%topic, error = %err, "failed to subscribe");
            }
        }
    }
}

/// Hand one inbound message to its pipeline channel.
///
/// Returns `false` once the matching channel is closed.
async fn route(
    topics: &Topics,
    topic: &str,
    payload: &[u8],
    sensors: &mpsc::Sender<SensorEventEnvelope>,
    hubs: &mpsc::Sender<HubEventEnvelope>,
) -> bool {
    match topics.decode(topic, payload) {
        Ok(Inbound::Sensor(envelope)) => sensors.send(envelope).await.is_ok(),
        Ok(Inbound::Hub(envelope)) => hubs.send(envelope).await.is_ok(),
        Err(err) => {
            tracing::warn!(%topic, error = %ErrorChain::new(&err), "dropping MQTT message");
            true
        }
    }
}
