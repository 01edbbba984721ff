//! In-memory queue used by tests and dry runs.
//!
//! Payloads land on an unbounded flume channel; the sender side is clone-safe
//! under concurrent publishes and the receiving half can be handed to a test
//! to assert on exactly what was delivered.

use bytes::Bytes;

use super::{ConnectOptions, Publisher, QueueClient, QueueError};

pub struct MockQueue {
    tx: flume::Sender<Bytes>,
    // Keeps the channel open when no test has taken a receiver.
    rx: flume::Receiver<Bytes>,
}

impl MockQueue {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self { tx, rx }
    }

    /// Receiver half for inspecting delivered payloads.
    pub fn receiver(&self) -> flume::Receiver<Bytes> {
        self.rx.clone()
    }
}

impl Default for MockQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn connect(_opts: ConnectOptions) -> Result<Box<dyn QueueClient>, QueueError> {
    Ok(Box::new(MockQueue::new()))
}

#[async_trait::async_trait]
impl QueueClient for MockQueue {
    async fn create_publisher(&self, _queue: &str) -> Result<Box<dyn Publisher>, QueueError> {
        Ok(Box::new(MockPublisher { tx: self.tx.clone() }))
    }

    async fn health_check(&self) -> Result<(), QueueError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), QueueError> {
        Ok(())
    }
}

struct MockPublisher {
    tx: flume::Sender<Bytes>,
}

#[async_trait::async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, payload: Bytes) -> Result<(), QueueError> {
        self.tx
            .send_async(payload)
            .await
            .map_err(|_| QueueError::Disconnected)
    }
}
