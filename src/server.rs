use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, error::PipelineError, types::PendingAuth};

/// Router of the local callback server.
pub fn router(state: Arc<Mutex<Option<PendingAuth>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the OAuth callback on `SERVER_ADDRESS` until the process exits.
pub async fn start_api_server(state: Arc<Mutex<Option<PendingAuth>>>) -> Result<(), PipelineError> {
    let addr = SocketAddr::from_str(&config::server_addr()).map_err(|e| {
        PipelineError::InvalidInput(format!("failed to parse server address: {}", e))
    })?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
