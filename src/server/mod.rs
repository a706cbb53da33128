//! HTTP surface of the service.
//!
//! Routes validate their input, call the shared [`RemoteCallExecutor`] and
//! translate executor failures into 500 responses.

mod error;
pub mod handlers;
pub mod validate;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::executor::RemoteCallExecutor;

pub use error::{ApiError, ErrorResponse};

/// Prefix of the API routes.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<RemoteCallExecutor>,
}

/// Builds the application router around an executor.
pub fn router(executor: Arc<RemoteCallExecutor>) -> Router {
    let api = Router::new()
        .route("/plannable-products", get(handlers::get_plannable_products))
        .route("/customers/{customer_id}", get(handlers::get_customers))
        .route("/reach-forecast", get(handlers::get_reach_forecast));

    Router::new()
        .route("/health", get(handlers::health))
        .nest(API_PREFIX, api)
        .with_state(AppState { executor })
}

/// Serves `app` until Ctrl-C or SIGTERM.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    let addr = listener.local_addr().context("Listener has no local address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
