//! Locally served forecast dashboard.
//!
//! One route (`/`) returns a pre-rendered page holding the interactive chart.
//! The server blocks until Ctrl-C or SIGTERM.

use std::sync::Arc;

use axum::{Router, extract::State, response::Html, routing::get};
use tokio::{net::TcpListener, signal};
use tracing::info;

use crate::app::pipeline::RunOutput;
use crate::error::AppError;

pub mod page;

pub use page::*;

/// Build the router serving `page` at `/`.
pub fn router(page: Arc<str>) -> Router {
    Router::new().route("/", get(index)).with_state(page)
}

async fn index(State(page): State<Arc<str>>) -> Html<String> {
    Html(page.to_string())
}

/// Render the forecast page and serve it on `host:port` until shut down.
pub fn serve(output: &RunOutput, host: &str, port: u16) -> Result<(), AppError> {
    let page: Arc<str> = render_page(output).into();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::runtime(format!("Failed to start async runtime: {e}")))?;

    runtime.block_on(async move {
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|e| AppError::runtime(format!("Failed to bind {host}:{port}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::runtime(format!("Failed to read bound address: {e}")))?;

        info!(%addr, "dashboard listening");
        println!("Dashboard running on http://{addr}/ (Ctrl-C to stop)");

        axum::serve(listener, router(page))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::runtime(format!("Dashboard server error: {e}")))
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("dashboard shutting down");
}
