//! EmbeddedClient: in-process knowledge graph client
//!
//! Works on a `KnowledgeGraph` directly, no network needed. With a
//! `JsonStore` attached, every mutation is saved like the server does.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use learngraph::graph::{
    KnowledgeGraph, NodeId, NodeKind, PropertyMap, Relationship, DEFAULT_WEIGHT,
};
use learngraph::http::handler::StorageCounts;
use learngraph::{GraphVisualizer, JsonStore, RecommendationEngine};

use crate::client::LearnGraphClient;
use crate::error::{SdkError, SdkResult};
use crate::models::{
    GraphData, GraphStatistics, LearningPathResponse, MutationResponse, NeighborsResponse,
    NewEdge, NewNode, NodeDetails, PathResponse, Recommendation, ServerStatus,
};

const DEFAULT_LIMIT: usize = 5;

/// In-process client that wraps a KnowledgeGraph directly.
pub struct EmbeddedClient {
    pub(crate) graph: Arc<RwLock<KnowledgeGraph>>,
    store: Option<JsonStore>,
}

impl EmbeddedClient {
    /// Create a new EmbeddedClient with a fresh empty graph
    pub fn new() -> Self {
        Self::with_graph(Arc::new(RwLock::new(KnowledgeGraph::new())))
    }

    /// Create an EmbeddedClient sharing an existing graph
    pub fn with_graph(graph: Arc<RwLock<KnowledgeGraph>>) -> Self {
        Self { graph, store: None }
    }

    /// Save after every mutation
    pub fn with_store(mut self, store: JsonStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Get a reference to the underlying graph
    pub fn shared_graph(&self) -> &Arc<RwLock<KnowledgeGraph>> {
        &self.graph
    }

    fn persist(&self, graph: &KnowledgeGraph) -> SdkResult<()> {
        if let Some(store) = &self.store {
            store.save(graph)?;
        }
        Ok(())
    }

    fn done(message: String) -> MutationResponse {
        MutationResponse {
            success: true,
            message,
        }
    }
}

impl Default for EmbeddedClient {
    fn default() -> Self {
        Self::new()
    }
}

fn non_blank(value: &str, field: &str) -> SdkResult<NodeId> {
    if value.trim().is_empty() {
        Err(SdkError::InvalidRequest(format!(
            "Missing required field '{}'",
            field
        )))
    } else {
        Ok(NodeId::new(value))
    }
}

#[async_trait]
impl LearnGraphClient for EmbeddedClient {
    async fn status(&self) -> SdkResult<ServerStatus> {
        let graph = self.graph.read().await;
        Ok(ServerStatus {
            status: "healthy".to_string(),
            version: learngraph::VERSION.to_string(),
            storage: StorageCounts {
                nodes: graph.node_count(),
                edges: graph.edge_count(),
            },
        })
    }

    async fn graph(&self) -> SdkResult<GraphData> {
        let graph = self.graph.read().await;
        Ok(GraphVisualizer::new(&graph).graph_data())
    }

    async fn stats(&self, top: usize) -> SdkResult<GraphStatistics> {
        Ok(self.graph.read().await.statistics(top))
    }

    async fn recommendations(&self, limit: Option<usize>) -> SdkResult<Vec<Recommendation>> {
        let graph = self.graph.read().await;
        Ok(RecommendationEngine::new(&graph).recommend(limit.unwrap_or(DEFAULT_LIMIT)))
    }

    async fn add_node(&self, node: NewNode) -> SdkResult<MutationResponse> {
        let id = non_blank(&node.id, "id")?;
        let kind = node.kind.map(NodeKind::new).unwrap_or_default();

        let mut graph = self.graph.write().await;
        graph.add_node(id.clone(), kind, node.properties)?;
        self.persist(&graph)?;
        Ok(Self::done(format!("Node {} added", id)))
    }

    async fn get_node(&self, id: &str) -> SdkResult<NodeDetails> {
        let id = NodeId::new(id);
        let graph = self.graph.read().await;
        let node = graph
            .get_node(&id)
            .ok_or_else(|| learngraph::GraphError::NodeNotFound(id.clone()))?;
        Ok(NodeDetails {
            node: node.clone(),
            degree: graph.degree(&id),
            status: node.status(),
        })
    }

    async fn update_node(
        &self,
        id: &str,
        properties: PropertyMap,
        kind: Option<String>,
    ) -> SdkResult<MutationResponse> {
        let id = NodeId::new(id);
        let mut graph = self.graph.write().await;
        graph.set_node_properties(&id, properties, kind.map(NodeKind::new))?;
        self.persist(&graph)?;
        Ok(Self::done(format!("Node {} updated", id)))
    }

    async fn remove_node(&self, id: &str) -> SdkResult<MutationResponse> {
        let id = NodeId::new(id);
        let mut graph = self.graph.write().await;
        graph.remove_node(&id)?;
        self.persist(&graph)?;
        Ok(Self::done(format!("Node {} removed", id)))
    }

    async fn add_edge(&self, edge: NewEdge) -> SdkResult<MutationResponse> {
        let source = non_blank(&edge.source, "source")?;
        let target = non_blank(&edge.target, "target")?;
        let relationship = edge.relationship.map(Relationship::new).unwrap_or_default();

        let mut graph = self.graph.write().await;
        graph.add_edge(
            &source,
            &target,
            relationship,
            edge.weight.unwrap_or(DEFAULT_WEIGHT),
        )?;
        self.persist(&graph)?;
        Ok(Self::done(format!(
            "Edge added between {} and {}",
            source, target
        )))
    }

    async fn remove_edge(&self, source: &str, target: &str) -> SdkResult<MutationResponse> {
        let source = NodeId::new(source);
        let target = NodeId::new(target);
        let mut graph = self.graph.write().await;
        graph.remove_edge(&source, &target)?;
        self.persist(&graph)?;
        Ok(Self::done(format!(
            "Edge removed between {} and {}",
            source, target
        )))
    }

    async fn neighbors(&self, id: &str) -> SdkResult<NeighborsResponse> {
        let id = NodeId::new(id);
        let graph = self.graph.read().await;
        if !graph.has_node(&id) {
            return Err(learngraph::GraphError::NodeNotFound(id).into());
        }
        Ok(NeighborsResponse {
            successors: graph.successors(&id).into_iter().cloned().collect(),
            predecessors: graph.predecessors(&id).into_iter().cloned().collect(),
            node: id,
        })
    }

    async fn find_path(&self, source: &str, target: &str) -> SdkResult<PathResponse> {
        let source = NodeId::new(source);
        let target = NodeId::new(target);
        let path = self.graph.read().await.find_path(&source, &target)?;
        Ok(PathResponse {
            source,
            target,
            path,
        })
    }

    async fn learning_path(&self, id: &str) -> SdkResult<LearningPathResponse> {
        let target = NodeId::new(id);
        let path = self.graph.read().await.learning_path(&target)?;
        Ok(LearningPathResponse { target, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> EmbeddedClient {
        let client = EmbeddedClient::new();
        client
            .add_node(NewNode::new("Python").property("level", "intermediate"))
            .await
            .unwrap();
        client.add_node(NewNode::new("Flask")).await.unwrap();
        client
            .add_edge(NewEdge::new("Python", "Flask").relationship("prerequisite"))
            .await
            .unwrap();
        client
    }

    #[tokio::test]
    async fn test_embedded_ping() {
        let client = EmbeddedClient::new();
        assert_eq!(client.ping().await.unwrap(), "PONG");
    }

    #[tokio::test]
    async fn test_embedded_status() {
        let client = seeded().await;
        let status = client.status().await.unwrap();
        assert_eq!(status.status, "healthy");
        assert_eq!(status.storage.nodes, 2);
        assert_eq!(status.storage.edges, 1);
    }

    #[tokio::test]
    async fn test_embedded_mutation_messages() {
        let client = EmbeddedClient::new();
        let added = client.add_node(NewNode::new("Rust")).await.unwrap();
        assert_eq!(added.message, "Node Rust added");

        client.add_node(NewNode::new("Tokio")).await.unwrap();
        let edge = client
            .add_edge(NewEdge::new("Rust", "Tokio"))
            .await
            .unwrap();
        assert_eq!(edge.message, "Edge added between Rust and Tokio");
    }

    #[tokio::test]
    async fn test_embedded_queries() {
        let client = seeded().await;

        let recs = client.recommendations(None).await.unwrap();
        assert_eq!(recs[0].node, NodeId::new("Flask"));

        let path = client.find_path("Python", "Flask").await.unwrap();
        assert_eq!(path.path.unwrap().len(), 2);

        let learning = client.learning_path("Flask").await.unwrap();
        assert_eq!(learning.path, vec![NodeId::new("Python"), NodeId::new("Flask")]);

        let neighbors = client.neighbors("Python").await.unwrap();
        assert_eq!(neighbors.successors, vec![NodeId::new("Flask")]);
    }

    #[tokio::test]
    async fn test_embedded_errors() {
        let client = seeded().await;

        let err = client.get_node("Haskell").await.unwrap_err();
        assert!(err.is_not_found());

        let err = client.add_node(NewNode::new(" ")).await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidRequest(_)));

        let err = client
            .add_edge(NewEdge::new("Python", "Haskell"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_embedded_blank_kind_keeps_current() {
        let client = EmbeddedClient::new();
        client
            .add_node(NewNode::new("Rust").kind("skill"))
            .await
            .unwrap();
        client
            .update_node("Rust", PropertyMap::new(), Some("  ".to_string()))
            .await
            .unwrap();
        assert_eq!(client.get_node("Rust").await.unwrap().node.kind.as_str(), "skill");

        client.add_node(NewNode::new("Cargo").kind("")).await.unwrap();
        assert_eq!(client.get_node("Cargo").await.unwrap().node.kind.as_str(), "concept");
    }

    #[tokio::test]
    async fn test_embedded_remove() {
        let client = seeded().await;
        client.remove_edge("Python", "Flask").await.unwrap();
        assert_eq!(client.stats(5).await.unwrap().total_edges, 0);

        client.remove_node("Flask").await.unwrap();
        assert_eq!(client.graph().await.unwrap().nodes.len(), 1);
    }
}
