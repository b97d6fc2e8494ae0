//! HTTP server lifecycle

use std::{future::Future, net::SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{routes, state::AppState};

/// The docsearch HTTP server
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the server around shared state
    pub fn new(state: AppState) -> Self {
        Self {
            router: routes::app(state),
        }
    }

    /// Bind `addr` and serve until Ctrl-C
    pub async fn run(self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(address = %listener.local_addr()?, "docsearch API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("docsearch API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
