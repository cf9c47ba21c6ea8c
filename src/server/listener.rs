use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::http::connection::Connection;
use crate::routes::Router;
use crate::server::state::ServerState;
use crate::store::FileStore;

pub async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    info!("Listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept loop. Each accept waits at most `poll_interval` so the shutdown
/// flag is rechecked even when no clients arrive. Returns once shutdown is
/// requested; the listener is closed on return.
pub async fn serve<S: FileStore>(
    listener: TcpListener,
    router: Arc<Router<S>>,
    state: Arc<ServerState>,
    poll_interval: Duration,
) -> anyhow::Result<()> {
    loop {
        if state.is_shutting_down() {
            info!("Shutting down accept loop");
            break;
        }

        let (socket, peer) = match tokio::time::timeout(poll_interval, listener.accept()).await {
            // Poll tick: go back and look at the shutdown flag
            Err(_elapsed) => continue,
            Ok(Ok(accepted)) => accepted,
            Ok(Err(e)) => {
                if state.is_shutting_down() {
                    break;
                }
                warn!(error = %e, "Error accepting connection");
                continue;
            }
        };

        let guard = state.connection_opened();
        info!(
            peer = %peer,
            user = guard.user(),
            active = guard.active_at_open(),
            "Accepted connection"
        );

        let router = Arc::clone(&router);
        let server = Arc::clone(&state);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, router, Arc::clone(&server), peer.to_string());
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
            drop(conn);
            drop(guard);
            info!(peer = %peer, active = server.active_users(), "Connection closed");
        });
    }

    drop(listener);
    Ok(())
}
