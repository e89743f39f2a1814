use std::future::Future;
use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::error::Result;

/// Start the API server
pub async fn start_api_server(state: AppState, addr: SocketAddr) -> Result<()> {
    start_api_server_with_shutdown(state, addr, std::future::pending()).await
}

/// Start the API server, draining connections once `shutdown` resolves
pub async fn start_api_server_with_shutdown<F>(state: AppState, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("API server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("API server stopped");
    Ok(())
}
