//! In-memory knowledge graph storage
//!
//! A directed simple graph keyed by topic name. Nodes and edges iterate in
//! insertion order, which makes every ranking tie-break reproducible.

use super::edge::{Edge, DEFAULT_WEIGHT};
use super::node::Node;
use super::property::PropertyMap;
use super::types::{NodeId, NodeKind, Relationship};
use crate::algo;
use indexmap::{IndexMap, IndexSet};
use learngraph_algorithms::{bfs, topological_order, weakly_connected_components};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node '{0}' not found")]
    NodeNotFound(NodeId),

    #[error("Edge '{0}' -> '{1}' not found")]
    EdgeNotFound(NodeId, NodeId),

    #[error("Node id must not be empty")]
    InvalidNodeId,

    #[error("Edge weight must be a finite, non-negative number (got {0})")]
    InvalidWeight(f64),

    #[error("Node '{0}' cannot be connected to itself")]
    SelfLoop(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Outcome of adding a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeUpsert {
    Created,
    Updated,
}

/// Outcome of adding an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeUpsert {
    Created,
    Updated,
}

/// A node and how many edges touch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionCount {
    pub node: NodeId,
    pub connections: usize,
}

/// Summary figures shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub node_types: BTreeMap<String, usize>,
    pub most_connected: Vec<ConnectionCount>,
    /// Number of weakly connected components
    pub components: usize,
    /// Directed density: edges / (n * (n - 1))
    pub density: f64,
}

/// In-memory knowledge graph
///
/// - nodes: NodeId -> Node (insertion ordered)
/// - edges: (source, target) -> Edge (insertion ordered)
/// - outgoing / incoming: adjacency sets per node
/// - kind_index: NodeKind -> node ids
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<(NodeId, NodeId), Edge>,
    outgoing: HashMap<NodeId, IndexSet<NodeId>>,
    incoming: HashMap<NodeId, IndexSet<NodeId>>,
    kind_index: HashMap<NodeKind, IndexSet<NodeId>>,
}

impl KnowledgeGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or update it when the id already exists.
    ///
    /// Updating replaces the kind and merges `properties` over the existing
    /// ones; the creation timestamp is kept.
    pub fn add_node(
        &mut self,
        id: impl Into<NodeId>,
        kind: impl Into<NodeKind>,
        properties: PropertyMap,
    ) -> GraphResult<NodeUpsert> {
        let id = id.into();
        if !id.is_valid() {
            return Err(GraphError::InvalidNodeId);
        }
        let kind = NodeKind::or_default(kind.into());

        if self.nodes.contains_key(&id) {
            self.update_node(&id, properties, Some(kind))?;
            debug!(node = %id, "updated node");
            return Ok(NodeUpsert::Updated);
        }

        self.insert_recovered_node(Node::new_with_properties(id.clone(), kind, properties))?;
        debug!(node = %id, "created node");
        Ok(NodeUpsert::Created)
    }

    /// Merge properties into an existing node, optionally changing its kind.
    /// A blank kind leaves the current one in place.
    pub fn set_node_properties(
        &mut self,
        id: &NodeId,
        properties: PropertyMap,
        kind: Option<NodeKind>,
    ) -> GraphResult<&Node> {
        self.update_node(id, properties, kind)?;
        self.nodes.get(id).ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    fn update_node(
        &mut self,
        id: &NodeId,
        properties: PropertyMap,
        kind: Option<NodeKind>,
    ) -> GraphResult<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;

        if let Some(kind) = kind.filter(|k| !k.as_str().trim().is_empty()) {
            if node.kind != kind {
                if let Some(ids) = self.kind_index.get_mut(&node.kind) {
                    ids.shift_remove(id);
                }
                self.kind_index
                    .entry(kind.clone())
                    .or_default()
                    .insert(id.clone());
                node.kind = kind;
            }
        }
        node.merge_properties(properties);
        Ok(())
    }

    /// Insert a fully formed node, keeping its timestamps.
    ///
    /// Used when restoring a saved graph; an existing node with the same id is
    /// replaced but keeps its edges.
    pub fn insert_recovered_node(&mut self, mut node: Node) -> GraphResult<()> {
        if !node.id.is_valid() {
            return Err(GraphError::InvalidNodeId);
        }
        node.kind = node.kind.or_default();
        let id = node.id.clone();

        if let Some(previous) = self.nodes.get(&id) {
            if let Some(ids) = self.kind_index.get_mut(&previous.kind) {
                ids.shift_remove(&id);
            }
        }

        self.kind_index
            .entry(node.kind.clone())
            .or_default()
            .insert(id.clone());
        self.outgoing.entry(id.clone()).or_default();
        self.incoming.entry(id.clone()).or_default();
        self.nodes.insert(id, node);
        Ok(())
    }

    /// Add an edge between two existing nodes, or update the existing one.
    ///
    /// Updating replaces relationship and weight.
    pub fn add_edge(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        relationship: impl Into<Relationship>,
        weight: f64,
    ) -> GraphResult<EdgeUpsert> {
        let relationship = Relationship::or_default(relationship.into());
        let key = (source.clone(), target.clone());

        if let Some(edge) = self.edges.get_mut(&key) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(GraphError::InvalidWeight(weight));
            }
            edge.relationship = relationship;
            edge.weight = weight;
            debug!(source = %source, target = %target, "updated edge");
            return Ok(EdgeUpsert::Updated);
        }

        self.insert_recovered_edge(Edge::new(source.clone(), target.clone(), relationship, weight))?;
        debug!(source = %source, target = %target, "created edge");
        Ok(EdgeUpsert::Created)
    }

    /// Add an edge with the default weight
    pub fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        relationship: impl Into<Relationship>,
    ) -> GraphResult<EdgeUpsert> {
        self.add_edge(source, target, relationship, DEFAULT_WEIGHT)
    }

    /// Insert a fully formed edge, keeping its timestamp.
    pub fn insert_recovered_edge(&mut self, mut edge: Edge) -> GraphResult<()> {
        if !self.has_node(&edge.source) {
            return Err(GraphError::NodeNotFound(edge.source.clone()));
        }
        if !self.has_node(&edge.target) {
            return Err(GraphError::NodeNotFound(edge.target.clone()));
        }
        if edge.source == edge.target {
            return Err(GraphError::SelfLoop(edge.source.clone()));
        }
        if !edge.weight.is_finite() || edge.weight < 0.0 {
            return Err(GraphError::InvalidWeight(edge.weight));
        }
        edge.relationship = edge.relationship.or_default();

        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.target.clone());
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.source.clone());
        self.edges.insert(edge.key(), edge);
        Ok(())
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, id: &NodeId) -> GraphResult<Node> {
        let node = self
            .nodes
            .shift_remove(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;

        if let Some(ids) = self.kind_index.get_mut(&node.kind) {
            ids.shift_remove(id);
        }

        let targets = self.outgoing.remove(id).unwrap_or_default();
        for target in &targets {
            self.edges.shift_remove(&(id.clone(), target.clone()));
            if let Some(sources) = self.incoming.get_mut(target) {
                sources.shift_remove(id);
            }
        }

        let sources = self.incoming.remove(id).unwrap_or_default();
        for source in &sources {
            self.edges.shift_remove(&(source.clone(), id.clone()));
            if let Some(targets) = self.outgoing.get_mut(source) {
                targets.shift_remove(id);
            }
        }

        debug!(node = %id, removed_edges = targets.len() + sources.len(), "removed node");
        Ok(node)
    }

    /// Remove the edge `source -> target`
    pub fn remove_edge(&mut self, source: &NodeId, target: &NodeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .shift_remove(&(source.clone(), target.clone()))
            .ok_or_else(|| GraphError::EdgeNotFound(source.clone(), target.clone()))?;

        if let Some(targets) = self.outgoing.get_mut(source) {
            targets.shift_remove(target);
        }
        if let Some(sources) = self.incoming.get_mut(target) {
            sources.shift_remove(source);
        }
        Ok(edge)
    }

    /// Get a node by ID
    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get the edge `source -> target`
    pub fn get_edge(&self, source: &NodeId, target: &NodeId) -> Option<&Edge> {
        self.edges.get(&(source.clone(), target.clone()))
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Check if the edge `source -> target` exists
    pub fn has_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        self.outgoing
            .get(source)
            .map(|targets| targets.contains(target))
            .unwrap_or(false)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Edges leaving a node
    pub fn outgoing_edges(&self, id: &NodeId) -> Vec<&Edge> {
        self.successors(id)
            .into_iter()
            .filter_map(|target| self.get_edge(id, target))
            .collect()
    }

    /// Edges entering a node
    pub fn incoming_edges(&self, id: &NodeId) -> Vec<&Edge> {
        self.predecessors(id)
            .into_iter()
            .filter_map(|source| self.get_edge(source, id))
            .collect()
    }

    /// Get nodes of a given kind
    pub fn nodes_by_kind(&self, kind: &NodeKind) -> Vec<&Node> {
        self.kind_index
            .get(kind)
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Count of nodes per kind
    pub fn node_types(&self) -> BTreeMap<String, usize> {
        self.kind_index
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(kind, ids)| (kind.as_str().to_string(), ids.len()))
            .collect()
    }

    /// In-degree plus out-degree (0 for unknown nodes)
    pub fn degree(&self, id: &NodeId) -> usize {
        self.outgoing.get(id).map(IndexSet::len).unwrap_or(0)
            + self.incoming.get(id).map(IndexSet::len).unwrap_or(0)
    }

    /// The `n` nodes with the most connections, ties in insertion order
    pub fn most_connected(&self, n: usize) -> Vec<ConnectionCount> {
        let mut degrees: Vec<ConnectionCount> = self
            .nodes
            .keys()
            .map(|id| ConnectionCount {
                node: id.clone(),
                connections: self.degree(id),
            })
            .collect();
        degrees.sort_by(|a, b| b.connections.cmp(&a.connections));
        degrees.truncate(n);
        degrees
    }

    /// Successors of a node (empty for unknown nodes)
    pub fn successors(&self, id: &NodeId) -> Vec<&NodeId> {
        self.outgoing
            .get(id)
            .map(|targets| targets.iter().collect())
            .unwrap_or_default()
    }

    /// Alias of [`successors`](Self::successors): topics reachable in one step
    pub fn neighbors(&self, id: &NodeId) -> Vec<&NodeId> {
        self.successors(id)
    }

    /// Predecessors of a node (empty for unknown nodes)
    pub fn predecessors(&self, id: &NodeId) -> Vec<&NodeId> {
        self.incoming
            .get(id)
            .map(|sources| sources.iter().collect())
            .unwrap_or_default()
    }

    /// Nodes with a `prerequisite` edge into `id`, in insertion order
    pub fn prerequisites_of(&self, id: &NodeId) -> Vec<&NodeId> {
        self.predecessors(id)
            .into_iter()
            .filter(|source| {
                self.get_edge(source, id)
                    .map(|edge| edge.relationship.is_prerequisite())
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Shortest directed path (by hop count) between two nodes.
    ///
    /// Returns `Ok(None)` when the target is unreachable.
    pub fn find_path(&self, source: &NodeId, target: &NodeId) -> GraphResult<Option<Vec<NodeId>>> {
        if !self.has_node(source) {
            return Err(GraphError::NodeNotFound(source.clone()));
        }
        if !self.has_node(target) {
            return Err(GraphError::NodeNotFound(target.clone()));
        }

        let projected = algo::build_view(self, None);
        let (Some(from), Some(to)) = (projected.algo_id(source), projected.algo_id(target)) else {
            return Ok(None);
        };

        Ok(bfs(&projected.view, from, to).map(|result| projected.resolve(&result.path)))
    }

    /// Every transitive prerequisite of `target`, ordered so each topic comes
    /// after its own prerequisites, followed by `target` itself.
    pub fn learning_path(&self, target: &NodeId) -> GraphResult<Vec<NodeId>> {
        if !self.has_node(target) {
            return Err(GraphError::NodeNotFound(target.clone()));
        }

        let mut members: IndexSet<&NodeId> = IndexSet::new();
        let mut queue = VecDeque::from([target]);
        while let Some(current) = queue.pop_front() {
            for prerequisite in self.prerequisites_of(current) {
                if prerequisite != target && members.insert(prerequisite) {
                    queue.push_back(prerequisite);
                }
            }
        }

        // Keep the subset in graph insertion order so ties are stable
        let ordered: Vec<&NodeId> = self
            .nodes
            .keys()
            .filter(|id| members.contains(id) || *id == target)
            .collect();

        let prerequisite = Relationship::prerequisite();
        let projected = algo::build_view_for(self, ordered, Some(&prerequisite));
        let topo = topological_order(&projected.view);

        let mut path: Vec<NodeId> = projected
            .resolve(&topo.order)
            .into_iter()
            .chain(projected.resolve(&topo.cyclic))
            .filter(|id| id != target)
            .collect();
        path.push(target.clone());
        Ok(path)
    }

    /// Induced subgraph on the given ids; unknown ids are ignored
    pub fn subgraph<'a>(&self, ids: impl IntoIterator<Item = &'a NodeId>) -> KnowledgeGraph {
        let wanted: IndexSet<&NodeId> = ids.into_iter().collect();
        let mut sub = KnowledgeGraph::new();

        for node in self.nodes.values().filter(|n| wanted.contains(&n.id)) {
            // Ids in the source graph are already valid
            let _ = sub.insert_recovered_node(node.clone());
        }
        for edge in self.edges.values() {
            if wanted.contains(&edge.source) && wanted.contains(&edge.target) {
                let _ = sub.insert_recovered_edge(edge.clone());
            }
        }
        sub
    }

    /// Dashboard statistics with the `top_n` most connected nodes
    pub fn statistics(&self, top_n: usize) -> GraphStatistics {
        let n = self.node_count();
        let m = self.edge_count();
        let density = if n > 1 {
            m as f64 / (n * (n - 1)) as f64
        } else {
            0.0
        };

        let projected = algo::build_view(self, None);
        let components = weakly_connected_components(&projected.view).component_count();

        GraphStatistics {
            total_nodes: n,
            total_edges: m,
            node_types: self.node_types(),
            most_connected: self.most_connected(top_n),
            components,
            density,
        }
    }

    /// Remove all nodes and edges
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.outgoing.clear();
        self.incoming.clear();
        self.kind_index.clear();
    }
}
