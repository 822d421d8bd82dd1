//! Edge implementation for the knowledge graph
//!
//! Edges are directed and typed by a [`Relationship`]. At most one edge exists
//! per ordered `(source, target)` pair.

use super::types::{NodeId, Relationship};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default weight of a newly created edge
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A directed edge in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node (edge goes FROM this node)
    pub source: NodeId,

    /// Target node (edge goes TO this node)
    pub target: NodeId,

    /// How the two topics relate
    pub relationship: Relationship,

    /// Strength of the connection
    pub weight: f64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relationship: impl Into<Relationship>,
        weight: f64,
    ) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
            weight,
            created_at: Utc::now(),
        }
    }

    /// Key used to index this edge
    pub fn key(&self) -> (NodeId, NodeId) {
        (self.source.clone(), self.target.clone())
    }

    /// Check if edge touches a node
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// Get the other end of the edge, if `node` is one of its ends
    pub fn other_node(&self, node: &NodeId) -> Option<&NodeId> {
        if &self.source == node {
            Some(&self.target)
        } else if &self.target == node {
            Some(&self.source)
        } else {
            None
        }
    }
}
