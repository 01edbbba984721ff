//! Redis adapter (feature `queue-redis`). The destination queue is a list;
//! each publish is one RPUSH. The connection manager reconnects on its own
//! within a bounded retry budget.

use bytes::Bytes;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};

use super::config::max_reconnects;
use super::{ConnectOptions, Publisher, QueueClient, QueueError};

pub struct RedisQueue {
    manager: ConnectionManager,
}

pub async fn connect(opts: ConnectOptions) -> Result<Box<dyn QueueClient>, QueueError> {
    let url = opts
        .params
        .get("url")
        .cloned()
        .unwrap_or_else(|| "redis://127.0.0.1:6379".into());
    let client = redis::Client::open(url.as_str()).map_err(|e| QueueError::Connect(e.to_string()))?;
    let config = ConnectionManagerConfig::new().set_number_of_retries(max_reconnects(&opts));
    let manager = client
        .get_connection_manager_with_config(config)
        .await
        .map_err(|e| QueueError::Connect(e.to_string()))?;
    Ok(Box::new(RedisQueue { manager }))
}

#[async_trait::async_trait]
impl QueueClient for RedisQueue {
    async fn create_publisher(&self, queue: &str) -> Result<Box<dyn Publisher>, QueueError> {
        Ok(Box::new(RedisPublisher {
            manager: self.manager.clone(),
            queue: queue.to_string(),
        }))
    }

    async fn health_check(&self) -> Result<(), QueueError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| QueueError::Other(e.to_string()))
    }

    async fn shutdown(&self) -> Result<(), QueueError> {
        Ok(())
    }
}

struct RedisPublisher {
    manager: ConnectionManager,
    queue: String,
}

#[async_trait::async_trait]
impl Publisher for RedisPublisher {
    async fn publish(&self, payload: Bytes) -> Result<(), QueueError> {
        let mut conn = self.manager.clone();
        redis::cmd("RPUSH")
            .arg(&self.queue)
            .arg(payload.as_ref())
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| QueueError::Publish(e.to_string()))
    }
}
