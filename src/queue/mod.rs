//! Queue abstraction: traits, error type, and the engine factory.
//!
//! The load generator only ever sends. A `QueueClient` is the long-lived
//! session with the queue service; a `Publisher` is a send handle bound to
//! one named destination queue, shared by every worker of a batch.

pub mod config;
#[cfg(feature = "queue-amqp")]
pub mod amqp;
#[cfg(any(test, feature = "queue-mock"))]
pub mod mock;
#[cfg(feature = "queue-nats")]
pub mod nats;
#[cfg(feature = "queue-redis")]
pub mod redis;

use std::collections::BTreeMap;

use bytes::Bytes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Engine {
    Nats,
    Amqp,
    Redis,
    #[cfg(any(test, feature = "queue-mock"))]
    Mock,
}

/// Engine-specific connection parameters (`k=v` pairs from CLI or env).
#[derive(Clone, Debug, Default)]
pub struct ConnectOptions {
    pub params: BTreeMap<String, String>,
}

#[derive(thiserror::Error, Debug)]
pub enum QueueError {
    #[error("connect: {0}")]
    Connect(String),
    #[error("publish: {0}")]
    Publish(String),
    #[error("disconnected")]
    Disconnected,
    #[error("other: {0}")]
    Other(String),
}

/// Long-lived session with a queue service. Establishing it may fail; once
/// established it is kept for the process lifetime.
#[async_trait::async_trait]
pub trait QueueClient: Send + Sync {
    /// Declare a publisher bound to one named queue.
    async fn create_publisher(&self, queue: &str) -> Result<Box<dyn Publisher>, QueueError>;
    async fn health_check(&self) -> Result<(), QueueError>;
    async fn shutdown(&self) -> Result<(), QueueError>;
}

/// Send handle bound to a single destination queue. Implementations must be
/// safe to call from many workers at once; one message per call, no batching.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, payload: Bytes) -> Result<(), QueueError>;
}

pub struct QueueBuilder;

impl QueueBuilder {
    pub async fn connect(
        engine: Engine,
        opts: ConnectOptions,
    ) -> Result<Box<dyn QueueClient>, QueueError> {
        match engine {
            Engine::Nats => {
                #[cfg(feature = "queue-nats")]
                {
                    return crate::queue::nats::connect(opts).await;
                }
                #[cfg(not(feature = "queue-nats"))]
                {
                    let _ = opts;
                    Err(QueueError::Connect("nats feature disabled".into()))
                }
            }
            Engine::Amqp => {
                #[cfg(feature = "queue-amqp")]
                {
                    return crate::queue::amqp::connect(opts).await;
                }
                #[cfg(not(feature = "queue-amqp"))]
                {
                    let _ = opts;
                    Err(QueueError::Connect("amqp feature disabled".into()))
                }
            }
            Engine::Redis => {
                #[cfg(feature = "queue-redis")]
                {
                    return crate::queue::redis::connect(opts).await;
                }
                #[cfg(not(feature = "queue-redis"))]
                {
                    let _ = opts;
                    Err(QueueError::Connect("redis feature disabled".into()))
                }
            }
            #[cfg(any(test, feature = "queue-mock"))]
            Engine::Mock => crate::queue::mock::connect(opts).await,
        }
    }
}
