//! HTTP surface for Todo Live: the CRUD API, the SSE stream endpoint, the
//! ad-hoc notify endpoint, and the static file fallback.

use log::*;

pub(crate) use error::Error;
pub(crate) use service::AppState;

mod controller;
mod error;
pub mod router;
mod sse;

/// Binds the configured interface/port and serves the API until a shutdown
/// signal arrives.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let address = format!(
        "{}:{}",
        app_state.config.interface(),
        app_state.config.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("Server starting... listening for requests on http://{address}");

    axum::serve(listener, router::define_routes(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => {
            error!("Failed to install shutdown signal handler: {e}");
            // Returning would trigger an immediate shutdown; park instead so
            // the server keeps running, just without graceful termination.
            std::future::pending::<()>().await;
        }
    }
}
