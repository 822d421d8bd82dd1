//! HTTP handlers for the dashboard API

use super::error::{ApiError, ApiResult};
use super::extract::{ApiJson, ApiQuery};
use super::state::AppState;
use crate::graph::{
    GraphStatistics, LearningStatus, Node, NodeId, NodeKind, NodeUpsert, PropertyMap,
    Relationship, DEFAULT_WEIGHT,
};
use crate::persistence::{GraphDocument, LoadReport};
use crate::recommend::{Recommendation, RecommendationEngine};
use crate::visual::{GraphData, GraphVisualizer, Layout, Positions};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

const DEFAULT_TOP: usize = 5;

/// Body returned by every mutating endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

impl MutationResponse {
    fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageCounts {
    pub nodes: usize,
    pub edges: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub storage: StorageCounts,
}

#[derive(Debug, Deserialize)]
pub struct AddNodeRequest {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub properties: Option<PropertyMap>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNodeRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub properties: Option<PropertyMap>,
}

#[derive(Debug, Deserialize)]
pub struct AddEdgeRequest {
    pub source: Option<String>,
    pub target: Option<String>,
    pub relationship: Option<String>,
    pub weight: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveEdgeRequest {
    pub source: Option<String>,
    pub target: Option<String>,
}

/// A node with its computed fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDetails {
    #[serde(flatten)]
    pub node: Node,
    pub degree: usize,
    pub status: LearningStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeighborsResponse {
    pub node: NodeId,
    pub successors: Vec<NodeId>,
    pub predecessors: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPathResponse {
    pub target: NodeId,
    pub path: Vec<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResponse {
    pub source: NodeId,
    pub target: NodeId,
    pub path: Option<Vec<NodeId>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub report: LoadReport,
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    pub layout: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub top: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub source: Option<String>,
    pub target: Option<String>,
}

fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::missing(field))
}

/// Handler for system status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let graph = state.graph.read().await;
    Json(StatusResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        storage: StorageCounts {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        },
    })
}

pub async fn graph_handler(State(state): State<AppState>) -> Json<GraphData> {
    let graph = state.graph.read().await;
    Json(GraphVisualizer::new(&graph).graph_data())
}

pub async fn layout_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LayoutQuery>,
) -> Json<Positions> {
    let layout = query
        .layout
        .as_deref()
        .map(Layout::from_name)
        .unwrap_or_default();
    let graph = state.graph.read().await;
    Json(GraphVisualizer::new(&graph).positions(layout))
}

pub async fn cytoscape_handler(State(state): State<AppState>) -> Json<Value> {
    let graph = state.graph.read().await;
    Json(GraphVisualizer::new(&graph).export_cytoscape())
}

pub async fn export_handler(State(state): State<AppState>) -> Json<GraphDocument> {
    let graph = state.graph.read().await;
    Json(GraphDocument::from_graph(&graph))
}

/// Replace the whole graph with an uploaded document
pub async fn import_handler(
    State(state): State<AppState>,
    ApiJson(document): ApiJson<GraphDocument>,
) -> ApiResult<Json<ImportResponse>> {
    let (imported, report) = document.into_graph();

    let mut graph = state.graph.write().await;
    *graph = imported;
    state.persist(&graph).await?;

    info!(nodes = report.nodes, edges = report.edges, "imported graph");
    Ok(Json(ImportResponse {
        success: true,
        message: format!("Imported {} nodes and {} edges", report.nodes, report.edges),
        report,
    }))
}

pub async fn add_node_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddNodeRequest>,
) -> ApiResult<(StatusCode, Json<MutationResponse>)> {
    let id = required(request.id, "id")?;
    let kind = request
        .kind
        .filter(|k| !k.trim().is_empty())
        .map(NodeKind::new)
        .unwrap_or_default();

    let mut graph = state.graph.write().await;
    let outcome = graph.add_node(id.as_str(), kind, request.properties.unwrap_or_default())?;
    state.persist(&graph).await?;

    let status = match outcome {
        NodeUpsert::Created => StatusCode::CREATED,
        NodeUpsert::Updated => StatusCode::OK,
    };
    Ok((status, MutationResponse::ok(format!("Node {} added", id))))
}

pub async fn get_node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<NodeDetails>> {
    let id = NodeId::new(id);
    let graph = state.graph.read().await;
    let node = graph
        .get_node(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Node '{}' not found", id)))?;

    Ok(Json(NodeDetails {
        node: node.clone(),
        degree: graph.degree(&id),
        status: node.status(),
    }))
}

pub async fn update_node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateNodeRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let id = NodeId::new(id);
    let kind = request
        .kind
        .filter(|k| !k.trim().is_empty())
        .map(NodeKind::new);

    let mut graph = state.graph.write().await;
    graph.set_node_properties(&id, request.properties.unwrap_or_default(), kind)?;
    state.persist(&graph).await?;

    Ok(MutationResponse::ok(format!("Node {} updated", id)))
}

pub async fn delete_node_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    let id = NodeId::new(id);

    let mut graph = state.graph.write().await;
    graph.remove_node(&id)?;
    state.persist(&graph).await?;

    Ok(MutationResponse::ok(format!("Node {} removed", id)))
}

pub async fn neighbors_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<NeighborsResponse>> {
    let id = NodeId::new(id);
    let graph = state.graph.read().await;
    if !graph.has_node(&id) {
        return Err(ApiError::NotFound(format!("Node '{}' not found", id)));
    }

    Ok(Json(NeighborsResponse {
        successors: graph.successors(&id).into_iter().cloned().collect(),
        predecessors: graph.predecessors(&id).into_iter().cloned().collect(),
        node: id,
    }))
}

pub async fn learning_path_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<LearningPathResponse>> {
    let target = NodeId::new(id);
    let graph = state.graph.read().await;
    let path = graph.learning_path(&target)?;
    Ok(Json(LearningPathResponse { target, path }))
}

pub async fn add_edge_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddEdgeRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let source = NodeId::new(required(request.source, "source")?);
    let target = NodeId::new(required(request.target, "target")?);
    let relationship = request
        .relationship
        .filter(|r| !r.trim().is_empty())
        .map(Relationship::new)
        .unwrap_or_default();
    let weight = request.weight.unwrap_or(DEFAULT_WEIGHT);

    let mut graph = state.graph.write().await;
    graph.add_edge(&source, &target, relationship, weight)?;
    state.persist(&graph).await?;

    Ok(MutationResponse::ok(format!(
        "Edge added between {} and {}",
        source, target
    )))
}

pub async fn delete_edge_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RemoveEdgeRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let source = NodeId::new(required(request.source, "source")?);
    let target = NodeId::new(required(request.target, "target")?);

    let mut graph = state.graph.write().await;
    graph.remove_edge(&source, &target)?;
    state.persist(&graph).await?;

    Ok(MutationResponse::ok(format!(
        "Edge removed between {} and {}",
        source, target
    )))
}

pub async fn recommendations_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Json<Vec<Recommendation>> {
    let limit = state.limits.clamp(query.limit);
    let graph = state.graph.read().await;
    Json(RecommendationEngine::new(&graph).recommend(limit))
}

pub async fn stats_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TopQuery>,
) -> Json<GraphStatistics> {
    let graph = state.graph.read().await;
    Json(graph.statistics(query.top.unwrap_or(DEFAULT_TOP)))
}

pub async fn path_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PathQuery>,
) -> ApiResult<Json<PathResponse>> {
    let source = NodeId::new(required(query.source, "source")?);
    let target = NodeId::new(required(query.target, "target")?);

    let graph = state.graph.read().await;
    let path = graph.find_path(&source, &target)?;
    Ok(Json(PathResponse {
        source,
        target,
        path,
    }))
}
