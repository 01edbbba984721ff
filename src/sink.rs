//! Publish-side policy: encode, send, absorb failures.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::warn;

use crate::codec::QueueMessage;
use crate::queue::Publisher;

/// Publish front-end shared by all workers of a batch.
///
/// A failed publish is logged with enough context to identify the record,
/// counted, and otherwise dropped: no retry, no propagation, siblings keep
/// going. Throughput wins over per-message delivery here.
pub struct EventSink {
    publisher: Box<dyn Publisher>,
    sent: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time view of the sink counters (cumulative for the process).
#[derive(Debug, Clone, Copy)]
pub struct SinkSnapshot {
    pub sent: u64,
    pub errors: u64,
}

impl EventSink {
    pub fn new(publisher: Box<dyn Publisher>) -> Self {
        Self {
            publisher,
            sent: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> SinkSnapshot {
        SinkSnapshot {
            sent: self.sent.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    /// Encode and publish one message. The unit of work counts as processed
    /// whatever the outcome.
    pub async fn send(&self, msg: QueueMessage) {
        let payload = Bytes::from(msg.encode());
        match self.publisher.publish(payload).await {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                warn!(cmd = msg.kind().cmd(), id = msg.log_id(), "publish failed: {e}");
            }
        }
    }
}
