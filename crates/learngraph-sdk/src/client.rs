//! LearnGraphClient trait: the unified interface for embedded and remote modes

use async_trait::async_trait;
use crate::error::SdkResult;
use crate::models::{
    GraphData, GraphStatistics, LearningPathResponse, MutationResponse, NeighborsResponse,
    NewEdge, NewNode, NodeDetails, PathResponse, Recommendation, ServerStatus,
};
use learngraph::graph::PropertyMap;

/// Unified client interface for a knowledge graph.
///
/// Implemented by:
/// - `EmbeddedClient`: in-process, no network (for tests and embedded use)
/// - `RemoteClient`: connects to a running learngraph server via HTTP
#[async_trait]
pub trait LearnGraphClient: Send + Sync {
    /// Get server status
    async fn status(&self) -> SdkResult<ServerStatus>;

    /// Every node and edge, as drawn by the dashboard
    async fn graph(&self) -> SdkResult<GraphData>;

    /// Graph statistics with the `top` most connected topics
    async fn stats(&self, top: usize) -> SdkResult<GraphStatistics>;

    /// Recommendations; `None` uses the server default limit
    async fn recommendations(&self, limit: Option<usize>) -> SdkResult<Vec<Recommendation>>;

    /// Create a topic, or merge into an existing one
    async fn add_node(&self, node: NewNode) -> SdkResult<MutationResponse>;

    async fn get_node(&self, id: &str) -> SdkResult<NodeDetails>;

    /// Merge properties into a topic and optionally change its type
    async fn update_node(
        &self,
        id: &str,
        properties: PropertyMap,
        kind: Option<String>,
    ) -> SdkResult<MutationResponse>;

    /// Remove a topic and all of its connections
    async fn remove_node(&self, id: &str) -> SdkResult<MutationResponse>;

    /// Create a connection, or update the existing one
    async fn add_edge(&self, edge: NewEdge) -> SdkResult<MutationResponse>;

    async fn remove_edge(&self, source: &str, target: &str) -> SdkResult<MutationResponse>;

    async fn neighbors(&self, id: &str) -> SdkResult<NeighborsResponse>;

    /// Shortest directed path between two topics
    async fn find_path(&self, source: &str, target: &str) -> SdkResult<PathResponse>;

    /// Ordered prerequisites leading to a topic
    async fn learning_path(&self, id: &str) -> SdkResult<LearningPathResponse>;

    /// Ping the server
    async fn ping(&self) -> SdkResult<String> {
        let status = self.status().await?;
        Ok(if status.status == "healthy" {
            "PONG".to_string()
        } else {
            status.status
        })
    }
}
