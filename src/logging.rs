// Tracing setup
use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub fn init(level: &str) -> Result<()> {
    // RUST_LOG wins over the CLI flag when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}
