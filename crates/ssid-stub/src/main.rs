//! Content stub server: an in-memory `handleGenericVC` endpoint for local
//! development against `ssid-content`.

use std::net::SocketAddr;

use ssid_stub::{routes, MemoryContentService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("SSID_CONTENT_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8091);

    let app = routes::router(MemoryContentService::new());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ssid-content-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await
}
