//! Graph algorithms module
//!
//! Algorithms live in the `learngraph-algorithms` crate and work on a dense
//! CSR [`GraphView`]. This module projects a [`KnowledgeGraph`] into that view
//! and maps results back to topic names.

use crate::graph::{KnowledgeGraph, NodeId, Relationship};
use learngraph_algorithms::{GraphView, NodeId as AlgoNodeId};
use rustc_hash::FxHashMap;

// Re-export algorithms
pub use learngraph_algorithms::{
    betweenness_centrality, bfs, circular_layout, degree_centrality, dijkstra,
    hierarchical_layout, longest_path_layers, spring_layout, topological_order,
    weakly_connected_components, PathResult, Position, SpringConfig, TopologicalOrder, WccResult,
};

/// A [`GraphView`] together with the mapping back to topic names.
///
/// Algorithm ids are dense indices in graph insertion order.
#[derive(Debug)]
pub struct ProjectedGraph<'a> {
    pub view: GraphView,
    ids: Vec<&'a NodeId>,
    index: FxHashMap<&'a NodeId, usize>,
}

impl<'a> ProjectedGraph<'a> {
    /// Algorithm id of a topic, if it is part of the projection
    pub fn algo_id(&self, id: &NodeId) -> Option<AlgoNodeId> {
        self.index.get(id).map(|&idx| idx as AlgoNodeId)
    }

    /// Topic name of an algorithm id
    pub fn node_id(&self, algo_id: AlgoNodeId) -> Option<&'a NodeId> {
        self.ids.get(algo_id as usize).copied()
    }

    /// Map a list of algorithm ids back to owned topic names
    pub fn resolve(&self, algo_ids: &[AlgoNodeId]) -> Vec<NodeId> {
        algo_ids
            .iter()
            .filter_map(|&id| self.node_id(id))
            .cloned()
            .collect()
    }

    /// Projected topics in index order
    pub fn ids(&self) -> &[&'a NodeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Project the whole graph, optionally keeping only one relationship type
pub fn build_view<'a>(
    graph: &'a KnowledgeGraph,
    relationship: Option<&Relationship>,
) -> ProjectedGraph<'a> {
    build_view_for(graph, graph.nodes().map(|n| &n.id), relationship)
}

/// Project the subgraph induced by `nodes`, optionally keeping only one
/// relationship type. Edge weights are always carried.
pub fn build_view_for<'a>(
    graph: &'a KnowledgeGraph,
    nodes: impl IntoIterator<Item = &'a NodeId>,
    relationship: Option<&Relationship>,
) -> ProjectedGraph<'a> {
    let mut ids: Vec<&'a NodeId> = Vec::new();
    let mut index: FxHashMap<&'a NodeId, usize> = FxHashMap::default();
    for id in nodes {
        if graph.has_node(id) && !index.contains_key(id) {
            index.insert(id, ids.len());
            ids.push(id);
        }
    }

    // Edges leaving the projection, or of another relationship, are dropped
    let rows: Vec<Vec<(usize, f64)>> = ids
        .iter()
        .map(|&source| {
            graph
                .outgoing_edges(source)
                .into_iter()
                .filter(|edge| relationship.map_or(true, |rel| &edge.relationship == rel))
                .filter_map(|edge| index.get(&edge.target).map(|&target| (target, edge.weight)))
                .collect()
        })
        .collect();

    let view = GraphView::from_rows(rows, true);
    ProjectedGraph { view, ids, index }
}
