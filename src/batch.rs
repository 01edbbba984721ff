//! Fan-out coordination: split a total across workers, run them to completion.
//!
//! A batch launches a fresh set of tasks, joins them all, and returns. There
//! is no cancellation, no partial-result reporting, and no error aggregation;
//! publish failures are absorbed by the sink.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use crate::codec::QueueMessage;
use crate::events::{CartCreateEvent, OrderCreateEvent, OrderPaidEvent, ViewEvent};
use crate::sink::EventSink;

pub const DEFAULT_TOTAL: u64 = 100_000;
pub const DEFAULT_WORKERS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ViewBatchConfig {
    pub total: u64,
    pub workers: u64,
}

impl Default for ViewBatchConfig {
    fn default() -> Self {
        Self {
            total: DEFAULT_TOTAL,
            workers: DEFAULT_WORKERS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookBatchConfig {
    pub carts: u64,
    pub orders: u64,
    pub paids: u64,
    pub workers: u64,
}

impl Default for WebhookBatchConfig {
    fn default() -> Self {
        Self {
            carts: DEFAULT_TOTAL,
            orders: DEFAULT_TOTAL,
            paids: DEFAULT_TOTAL,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Units per worker. Truncating division: the remainder of an uneven split is
/// dropped, not redistributed.
pub fn partition(total_units: u64, worker_count: u64) -> u64 {
    if worker_count == 0 {
        return 0;
    }
    total_units / worker_count
}

/// Launch exactly `worker_count` tasks, each running `unit_of_work`
/// sequentially `partition(total_units, worker_count)` times, and return once
/// every worker is done. The closure receives the worker index.
pub async fn run_batch<F, Fut>(total_units: u64, worker_count: u64, unit_of_work: F)
where
    F: Fn(u64) -> Fut + Clone + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let per_worker = partition(total_units, worker_count);
    let mut handles = Vec::with_capacity(worker_count as usize);
    for worker in 0..worker_count {
        let unit = unit_of_work.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..per_worker {
                unit(worker).await;
            }
        }));
    }
    let _ = join_all(handles).await;
}

/// One unit = generate + encode + publish a single view event.
pub async fn run_view_batch(sink: Arc<EventSink>, config: ViewBatchConfig) {
    info!(total = config.total, workers = config.workers, "view batch starting");
    let before = sink.snapshot();
    let batch_sink = sink.clone();
    run_batch(config.total, config.workers, move |_worker| {
        let sink = batch_sink.clone();
        async move {
            let view = {
                let mut rng = rand::rng();
                ViewEvent::generate(&mut rng)
            };
            sink.send(QueueMessage::CampaignView(view)).await;
        }
    })
    .await;
    let after = sink.snapshot();
    info!(
        sent = after.sent - before.sent,
        errors = after.errors - before.errors,
        "view batch complete"
    );
}

/// Three sub-phases per worker, in order: cart creates, then order creates,
/// then order paids. Workers run concurrently; no barrier between sub-phases
/// across workers.
pub async fn run_webhook_batch(sink: Arc<EventSink>, config: WebhookBatchConfig) {
    info!(
        carts = config.carts,
        orders = config.orders,
        paids = config.paids,
        workers = config.workers,
        "webhook batch starting"
    );
    let before = sink.snapshot();
    let carts_per_worker = partition(config.carts, config.workers);
    let orders_per_worker = partition(config.orders, config.workers);
    let paids_per_worker = partition(config.paids, config.workers);
    let mut handles = Vec::with_capacity(config.workers as usize);
    for _worker in 0..config.workers {
        let sink = sink.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..carts_per_worker {
                let cart = {
                    let mut rng = rand::rng();
                    CartCreateEvent::generate(&mut rng)
                };
                sink.send(QueueMessage::CartCreate(cart)).await;
            }
            for _ in 0..orders_per_worker {
                let order = {
                    let mut rng = rand::rng();
                    OrderCreateEvent::generate(&mut rng)
                };
                sink.send(QueueMessage::OrderCreate(order)).await;
            }
            for _ in 0..paids_per_worker {
                let paid = {
                    let mut rng = rand::rng();
                    OrderPaidEvent::generate(&mut rng)
                };
                sink.send(QueueMessage::OrderPaid(paid)).await;
            }
        }));
    }
    let _ = join_all(handles).await;
    let after = sink.snapshot();
    info!(
        sent = after.sent - before.sent,
        errors = after.errors - before.errors,
        "webhook batch complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn partition_truncates() {
        assert_eq!(partition(100_000, 10), 10_000);
        assert_eq!(partition(1_005, 10), 100);
        assert_eq!(partition(7, 10), 0);
        assert_eq!(partition(10, 0), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_batch_invokes_unit_exactly_partitioned_times() {
        let count = Arc::new(AtomicU64::new(0));
        let c = count.clone();
        run_batch(100_000, 10, move |_| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::Relaxed);
            }
        })
        .await;
        // run_batch returned, so every worker has finished all its units.
        assert_eq!(count.load(Ordering::Relaxed), 100_000);
    }

    #[tokio::test]
    async fn run_batch_drops_uneven_remainder() {
        let count = Arc::new(AtomicU64::new(0));
        let c = count.clone();
        run_batch(1_005, 10, move |_| {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::Relaxed);
            }
        })
        .await;
        assert_eq!(count.load(Ordering::Relaxed), 1_000);
    }

    #[tokio::test]
    async fn run_batch_hands_each_worker_its_index() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let s = seen.clone();
        run_batch(4, 4, move |worker| {
            let s = s.clone();
            async move {
                s.lock().unwrap().push(worker);
            }
        })
        .await;
        let mut indices = seen.lock().unwrap().clone();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }
}
