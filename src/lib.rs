//! Synthetic event load generator for an analytics ingest queue.
//!
//! Two batch flavors share one pipeline: generate a fake record, encode it as
//! a single-line JSON payload, publish it to the configured queue. A fan-out
//! coordinator splits each batch across concurrent workers and tolerates
//! individual publish failures without aborting the run.

pub mod batch;
pub mod codec;
pub mod events;
pub mod logging;
pub mod queue;
pub mod server;
pub mod sink;
