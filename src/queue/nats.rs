//! NATS adapter (feature `queue-nats`). The destination queue maps to a
//! subject; reconnects are handled inside the client within a bounded budget.

use bytes::Bytes;

use super::config::max_reconnects;
use super::{ConnectOptions, Publisher, QueueClient, QueueError};

pub struct NatsQueue {
    client: async_nats::Client,
}

pub async fn connect(opts: ConnectOptions) -> Result<Box<dyn QueueClient>, QueueError> {
    let url = opts
        .params
        .get("url")
        .cloned()
        .unwrap_or_else(|| "nats://127.0.0.1:4222".into());
    let name = opts
        .params
        .get("client_id")
        .cloned()
        .unwrap_or_else(|| format!("loadgen-{}", uuid::Uuid::new_v4()));
    let client = async_nats::ConnectOptions::new()
        .name(name)
        .max_reconnects(max_reconnects(&opts))
        .connect(url.as_str())
        .await
        .map_err(|e| QueueError::Connect(e.to_string()))?;
    Ok(Box::new(NatsQueue { client }))
}

#[async_trait::async_trait]
impl QueueClient for NatsQueue {
    async fn create_publisher(&self, queue: &str) -> Result<Box<dyn Publisher>, QueueError> {
        Ok(Box::new(NatsPublisher {
            client: self.client.clone(),
            subject: queue.to_string(),
        }))
    }

    async fn health_check(&self) -> Result<(), QueueError> {
        match self.client.connection_state() {
            async_nats::connection::State::Connected => Ok(()),
            _ => Err(QueueError::Disconnected),
        }
    }

    async fn shutdown(&self) -> Result<(), QueueError> {
        // Publishes are buffered client-side; flush before dropping the session.
        self.client
            .flush()
            .await
            .map_err(|e| QueueError::Other(e.to_string()))
    }
}

struct NatsPublisher {
    client: async_nats::Client,
    subject: String,
}

#[async_trait::async_trait]
impl Publisher for NatsPublisher {
    async fn publish(&self, payload: Bytes) -> Result<(), QueueError> {
        self.client
            .publish(self.subject.clone(), payload)
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))
    }
}
