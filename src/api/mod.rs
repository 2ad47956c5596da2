//! HTTP layer exposing entity extraction and a static landing page.

pub mod error;
pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::registry::Registry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

/// Route table of the service.
pub fn router(registry: Arc<Registry>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route("/", get(routes::home))
        .route("/health", get(routes::health))
        .route("/bio-ner/entities", post(routes::extract_entities))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { registry })
}

pub async fn serve(registry: Arc<Registry>, host: &str, port: u16) -> Result<()> {
    let router = router(registry);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving bionlp-service API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
