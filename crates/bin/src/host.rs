//! mmo-host - Static server for the browser client bundle.

mod config;

use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use config::HostConfig;
use rust_embed::RustEmbed;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Embedded static assets from client/web
#[derive(RustEmbed)]
#[folder = "../client/web"]
struct Assets;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("mmo-host - Client Static Server v{}", env!("CARGO_PKG_VERSION"));

    // First argument overrides the config path
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("host.toml"));
    let config = HostConfig::load(&config_path)?;
    info!("Loaded configuration from {}", config_path.display());
    info!("  Game server: {}", config.client.server_url);
    info!("  World: {}x{}", config.client.world_width, config.client.world_height);

    let embedded = Assets::iter().count();
    if Assets::get("pkg/client.js").is_none() {
        warn!("Client bundle missing from embedded assets (pkg/client.js); build it with wasm-pack");
    }
    info!("Embedded {} static files", embedded);

    let app = Router::new()
        .route("/", get(serve_index))
        .route("/index.html", get(serve_index))
        .route("/client-config.json", get(serve_client_config))
        .fallback(static_handler)
        .with_state(Arc::new(config.clone()))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    let ip: std::net::IpAddr = config.http.bind.parse()?;
    let addr = SocketAddr::new(ip, config.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Client available on http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Serve the main index.html page
async fn serve_index() -> impl IntoResponse {
    serve_static_file("index.html")
}

/// Client options generated from the `[client]` table of the config
async fn serve_client_config(State(config): State<Arc<HostConfig>>) -> impl IntoResponse {
    Json(config.client.to_client_json())
}

/// Handle static file requests
async fn static_handler(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    if path.is_empty() {
        return serve_static_file("index.html");
    }

    serve_static_file(path)
}

/// Serve a static file from embedded assets
fn serve_static_file(path: &str) -> Response {
    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => {
            warn!("Static file not found: {}", path);
            (StatusCode::NOT_FOUND, "404 Not Found").into_response()
        }
    }
}
