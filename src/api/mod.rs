//! Status viewer using Axum
//!
//! Read-only HTTP view of the status snapshot:
//! - `/` - HTML status page
//! - `/api/v1/status` - snapshot JSON
//! - `/health` - liveness probe
//!
//! Every request re-reads the snapshot file; nothing is cached and nothing
//! is ever written.

mod handlers;
mod page;
mod routes;

pub use handlers::ViewerState;

use std::io;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Create the complete viewer router.
pub fn create_app(state: ViewerState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(routes::page_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind the viewer to `addr` and serve it in the background until `cancel`
/// fires.
///
/// Binding happens before anything is spawned, so a busy or invalid address
/// is reported to the caller straight away. Returns the bound address and the
/// server task.
pub async fn spawn_viewer(
    addr: SocketAddr,
    state: ViewerState,
    cancel: CancellationToken,
) -> io::Result<(SocketAddr, JoinHandle<io::Result<()>>)> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "Status viewer listening");

    let server = tokio::spawn(async move {
        axum::serve(listener, create_app(state))
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
    });
    Ok((local_addr, server))
}
