use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use islander_core::content::Content;
use islander_core::map_html::map_html;

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(content: Arc<Content>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/places", get(list_places))
        .route("/api/routes", get(list_routes))
        .route("/api/curated", get(list_curated))
        .route("/api/activities", get(list_activities))
        .layer(CorsLayer::permissive())
        .with_state(content)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Serve the map page and the static content.
///
/// The page is a renderer only. It applies `CENTER`/`ADD`/`TOGGLE` messages
/// posted to its window by whatever embeds it (an iframe host, a webview);
/// this server never pushes commands of its own.
pub async fn run_serve(content: Content, bind: &str, port: u16) -> Result<()> {
    let app = build_router(Arc::new(content));
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("islander map listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("islander serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(content): State<Arc<Content>>) -> Response {
    Html(map_html(&content)).into_response()
}

async fn list_places(State(content): State<Arc<Content>>) -> Response {
    Json(&content.places).into_response()
}

async fn list_routes(State(content): State<Arc<Content>>) -> Response {
    Json(&content.routes).into_response()
}

async fn list_curated(State(content): State<Arc<Content>>) -> Response {
    Json(&content.curated).into_response()
}

async fn list_activities(State(content): State<Arc<Content>>) -> Response {
    Json(&content.activities).into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
