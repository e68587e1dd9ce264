mod auth;
mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use config::Config;
use router::create_router;
use state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;

use booking::store::MemoryStore;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting booking gateway service");

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr;

    // The production blob-store adapter is wired in at deployment;
    // this binary runs against the in-process store.
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(config, store)?;

    let app = create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on {}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
