use std::sync::Arc;

use courier::config::Config;
use courier::routes::Router;
use courier::server::{ServerState, admin, listener};
use courier::store::DiskStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::load()?;
    let state = Arc::new(ServerState::new(cfg.directory.clone()));
    let router = Arc::new(Router::new(DiskStore, Arc::clone(&state)));

    let socket = listener::bind(&cfg.listen_addr).await?;
    tracing::info!(directory = %cfg.directory.display(), "Serving files");

    admin::spawn_stdio(Arc::clone(&state))?;

    tokio::select! {
        res = listener::serve(socket, router, Arc::clone(&state), cfg.accept_poll_interval) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
            state.request_shutdown();
        }
    }

    if !state.wait_idle(cfg.drain_timeout).await {
        tracing::warn!(active = state.active_users(), "Drain timeout reached, closing open connections");
    }
    tracing::info!(total = state.total_users(), "Server stopped");

    Ok(())
}
