//! Itembook Server Binary

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use itembook_server::{serve, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load()?;

    // Initialize logging
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?}: {}, using \"info\"", config.log_filter, e);
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = Arc::new(AppState::open(&config.database)?);
    serve(&config.addr, state).await?;
    Ok(())
}
