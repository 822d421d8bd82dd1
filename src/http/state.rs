//! Shared server state

use super::error::ApiResult;
use crate::config::RecommendationConfig;
use crate::graph::KnowledgeGraph;
use crate::persistence::{GraphDocument, JsonStore};
use std::sync::Arc;
use tokio::sync::RwLock;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<RwLock<KnowledgeGraph>>,
    pub store: Arc<JsonStore>,
    pub limits: RecommendationConfig,
}

impl AppState {
    pub fn new(graph: KnowledgeGraph, store: JsonStore, limits: RecommendationConfig) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
            store: Arc::new(store),
            limits,
        }
    }

    /// Write the graph to disk. Callers hold the write lock across the
    /// await so saves happen in mutation order; the file I/O itself runs on
    /// the blocking pool.
    pub async fn persist(&self, graph: &KnowledgeGraph) -> ApiResult<()> {
        let document = GraphDocument::from_graph(graph);
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.save_document(&document)).await??;
        Ok(())
    }
}
