// src/server/mod.rs

//! Development server: a static file server over the distributable plus the
//! live-reload WebSocket channel.

pub mod livereload;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use axum::Router;
use tower_http::services::ServeDir;
use tracing::info;

pub use livereload::{start_livereload, LiveReload};

/// Serve the distributable directory over HTTP. Runs until the enclosing
/// task is dropped or the listener fails.
pub async fn serve(dist: PathBuf, port: u16) -> Result<()> {
    let address = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("serving {:?} on http://localhost:{port}/", dist);

    let router = Router::new().fallback_service(ServeDir::new(dist));
    axum::serve(listener, router).await?;

    Ok(())
}
