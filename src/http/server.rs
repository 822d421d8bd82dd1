//! HTTP server for the dashboard and its JSON API

use super::handler::{
    add_edge_handler, add_node_handler, cytoscape_handler, delete_edge_handler,
    delete_node_handler, export_handler, get_node_handler, graph_handler, import_handler,
    layout_handler, learning_path_handler, neighbors_handler, path_handler,
    recommendations_handler, stats_handler, status_handler, update_node_handler,
};
use super::state::AppState;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use rust_embed::RustEmbed;
use std::io;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(RustEmbed)]
#[folder = "src/http/static/"]
struct Assets;

async fn index_handler() -> Response {
    match Assets::get("index.html") {
        Some(file) => Html(String::from_utf8_lossy(file.data.as_ref()).into_owned()).into_response(),
        None => (StatusCode::NOT_FOUND, "dashboard not bundled").into_response(),
    }
}

/// Routes for the dashboard and API, without a listener
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/graph", get(graph_handler))
        .route("/api/graph/layout", get(layout_handler))
        .route("/api/graph/cytoscape", get(cytoscape_handler))
        .route("/api/export", get(export_handler))
        .route("/api/import", post(import_handler))
        .route("/api/nodes", post(add_node_handler))
        .route(
            "/api/nodes/:id",
            get(get_node_handler)
                .patch(update_node_handler)
                .delete(delete_node_handler),
        )
        .route("/api/nodes/:id/neighbors", get(neighbors_handler))
        .route("/api/nodes/:id/learning-path", get(learning_path_handler))
        .route("/api/edges", post(add_edge_handler).delete(delete_edge_handler))
        .route("/api/recommendations", get(recommendations_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/path", get(path_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server managing the dashboard API and static assets
pub struct HttpServer {
    state: AppState,
    address: String,
}

impl HttpServer {
    /// Create a new HTTP server bound to `address` (`host:port`)
    pub fn new(state: AppState, address: impl Into<String>) -> Self {
        Self {
            state,
            address: address.into(),
        }
    }

    /// Serve until Ctrl-C
    pub async fn start(&self) -> io::Result<()> {
        let app = router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(&self.address).await?;

        info!("Dashboard available at http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
