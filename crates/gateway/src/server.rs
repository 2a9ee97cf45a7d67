use std::net::SocketAddr;

use tracing::info;

use crate::routes::{AppState, build_router};

/// Bind the HTTP boundary and serve until the process exits.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
