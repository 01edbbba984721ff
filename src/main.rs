use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use ingest_loadgen::batch::{
    DEFAULT_TOTAL, DEFAULT_WORKERS, ViewBatchConfig, WebhookBatchConfig, run_view_batch,
    run_webhook_batch,
};
use ingest_loadgen::logging;
use ingest_loadgen::queue::config::{parse_connect_kv, parse_engine};
use ingest_loadgen::queue::{QueueBuilder, QueueClient};
use ingest_loadgen::server::{AppState, router};
use ingest_loadgen::sink::EventSink;

#[derive(Parser)]
#[command(name = "ingest-loadgen")]
#[command(about = "Synthetic event flood for the analytics ingest queue")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Queue engine (nats, amqp, redis)
    #[arg(long, env = "LOADGEN_ENGINE", default_value = "nats")]
    engine: String,

    /// Destination queue name or subject
    #[arg(long, env = "LOADGEN_QUEUE", default_value = "ingest-test-queue")]
    queue: String,

    /// Engine connect parameters as k=v pairs (url=..., max_reconnects=...)
    #[arg(long = "connect")]
    connect: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP trigger server
    Serve {
        /// Listen address
        #[arg(long, default_value = "0.0.0.0:5000")]
        addr: String,
    },
    /// Fire one view batch and exit
    Views {
        /// Total view events
        #[arg(long, default_value_t = DEFAULT_TOTAL)]
        total: u64,

        /// Concurrent workers
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: u64,
    },
    /// Fire one webhook batch and exit
    Webhooks {
        /// Total cart-create events
        #[arg(long, default_value_t = DEFAULT_TOTAL)]
        carts: u64,

        /// Total order-create events
        #[arg(long, default_value_t = DEFAULT_TOTAL)]
        orders: u64,

        /// Total order-paid events
        #[arg(long, default_value_t = DEFAULT_TOTAL)]
        paids: u64,

        /// Concurrent workers
        #[arg(long, default_value_t = DEFAULT_WORKERS)]
        workers: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logging::init(&cli.log_level)?;

    println!(
        "ingest-loadgen starting, engine: {}, queue: {}",
        cli.engine, cli.queue
    );

    let engine = parse_engine(&cli.engine)
        .ok_or_else(|| anyhow::anyhow!("unknown queue engine: {}", cli.engine))?;
    let opts = parse_connect_kv(&cli.connect);

    // One session per process. A failure here is fatal to publishing but not
    // to the server: triggers will acknowledge and skip.
    let client: Option<Box<dyn QueueClient>> = match QueueBuilder::connect(engine, opts).await {
        Ok(client) => Some(client),
        Err(e) => {
            error!("failed to connect to queue service: {e}");
            None
        }
    };
    let sink = match &client {
        Some(client) => match client.create_publisher(&cli.queue).await {
            Ok(publisher) => Some(Arc::new(EventSink::new(publisher))),
            Err(e) => {
                error!("failed to declare publisher for {}: {e}", cli.queue);
                None
            }
        },
        None => None,
    };

    match cli.command {
        Commands::Serve { addr } => {
            let state = Arc::new(AppState {
                sink,
                view_defaults: ViewBatchConfig::default(),
                webhook_defaults: WebhookBatchConfig::default(),
            });
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("listening on {addr}");
            axum::serve(listener, router(state))
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await?;
        }
        Commands::Views { total, workers } => {
            let Some(sink) = sink else {
                anyhow::bail!("queue publisher unavailable");
            };
            run_view_batch(sink, ViewBatchConfig { total, workers }).await;
        }
        Commands::Webhooks {
            carts,
            orders,
            paids,
            workers,
        } => {
            let Some(sink) = sink else {
                anyhow::bail!("queue publisher unavailable");
            };
            run_webhook_batch(
                sink,
                WebhookBatchConfig {
                    carts,
                    orders,
                    paids,
                    workers,
                },
            )
            .await;
        }
    }

    if let Some(client) = client {
        if let Err(e) = client.shutdown().await {
            error!("queue shutdown: {e}");
        }
    }

    Ok(())
}
