//! AMQP 0-9-1 adapter (feature `queue-amqp`), using lapin. Messages go to a
//! durable queue through the default exchange; the channel handle is safe to
//! share across workers.

use bytes::Bytes;
use lapin::options::{BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};

use super::{ConnectOptions, Publisher, QueueClient, QueueError};

pub struct AmqpQueue {
    conn: Connection,
    channel: Channel,
}

pub async fn connect(opts: ConnectOptions) -> Result<Box<dyn QueueClient>, QueueError> {
    let url = opts
        .params
        .get("url")
        .cloned()
        .unwrap_or_else(|| "amqp://127.0.0.1:5672/%2f".into());
    let conn = Connection::connect(&url, ConnectionProperties::default())
        .await
        .map_err(|e| QueueError::Connect(e.to_string()))?;
    let channel = conn
        .create_channel()
        .await
        .map_err(|e| QueueError::Connect(e.to_string()))?;
    Ok(Box::new(AmqpQueue { conn, channel }))
}

#[async_trait::async_trait]
impl QueueClient for AmqpQueue {
    async fn create_publisher(&self, queue: &str) -> Result<Box<dyn Publisher>, QueueError> {
        self.channel
            .queue_declare(
                queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| QueueError::Connect(e.to_string()))?;
        Ok(Box::new(AmqpPublisher {
            channel: self.channel.clone(),
            queue: queue.to_string(),
        }))
    }

    async fn health_check(&self) -> Result<(), QueueError> {
        if self.conn.status().connected() {
            Ok(())
        } else {
            Err(QueueError::Disconnected)
        }
    }

    async fn shutdown(&self) -> Result<(), QueueError> {
        self.conn
            .close(200, "bye")
            .await
            .map_err(|e| QueueError::Other(e.to_string()))
    }
}

struct AmqpPublisher {
    channel: Channel,
    queue: String,
}

#[async_trait::async_trait]
impl Publisher for AmqpPublisher {
    async fn publish(&self, payload: Bytes) -> Result<(), QueueError> {
        // Confirms are not enabled on the channel, so the returned confirm
        // resolves immediately and carries nothing worth waiting on.
        let _confirm = self
            .channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                payload.as_ref(),
                BasicProperties::default(),
            )
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))?;
        Ok(())
    }
}
