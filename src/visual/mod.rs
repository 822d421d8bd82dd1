//! Dashboard data
//!
//! Flattens the knowledge graph into the shapes the dashboard renders: a
//! node/edge listing, 2D positions for a chosen layout, and a Cytoscape.js
//! element document.

use crate::algo::{self, Position, SpringConfig};
use crate::graph::{KnowledgeGraph, NodeId, NodeKind, PropertyMap, Relationship};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// A node as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: NodeId,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub properties: PropertyMap,
    pub degree: usize,
}

/// An edge as shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub relationship: Relationship,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

/// Layout algorithm for [`GraphVisualizer::positions`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Spring,
    Circular,
    Hierarchical,
}

impl Layout {
    /// Parse a layout name; unknown names fall back to [`Layout::Spring`]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "circular" => Layout::Circular,
            "hierarchical" => Layout::Hierarchical,
            _ => Layout::Spring,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layout::Spring => "spring",
            Layout::Circular => "circular",
            Layout::Hierarchical => "hierarchical",
        };
        write!(f, "{}", name)
    }
}

/// Node id -> `[x, y]`, in graph order
pub type Positions = IndexMap<NodeId, [f64; 2]>;

pub struct GraphVisualizer<'a> {
    graph: &'a KnowledgeGraph,
}

impl<'a> GraphVisualizer<'a> {
    pub fn new(graph: &'a KnowledgeGraph) -> Self {
        Self { graph }
    }

    pub fn graph_data(&self) -> GraphData {
        let nodes = self
            .graph
            .nodes()
            .map(|node| VisualNode {
                id: node.id.clone(),
                label: node.id.as_str().to_string(),
                kind: node.kind.clone(),
                properties: node.properties.clone(),
                degree: self.graph.degree(&node.id),
            })
            .collect();

        let edges = self
            .graph
            .edges()
            .map(|edge| VisualEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
                relationship: edge.relationship.clone(),
                weight: edge.weight,
            })
            .collect();

        GraphData { nodes, edges }
    }

    /// Deterministic positions for every node
    pub fn positions(&self, layout: Layout) -> Positions {
        let projected = algo::build_view(self.graph, None);
        let coords: Vec<Position> = match layout {
            Layout::Spring => algo::spring_layout(&projected.view, &SpringConfig::default()),
            Layout::Circular => algo::circular_layout(projected.len()),
            Layout::Hierarchical => algo::hierarchical_layout(&projected.view),
        };

        projected
            .ids()
            .iter()
            .zip(coords)
            .map(|(&id, pos)| (id.clone(), [pos.x, pos.y]))
            .collect()
    }

    /// Cytoscape.js `{ elements: { nodes, edges } }` document.
    ///
    /// Node properties are flattened into `data`; `id`, `label` and `type`
    /// always come from the node itself.
    pub fn export_cytoscape(&self) -> Value {
        let data = self.graph_data();

        let nodes: Vec<Value> = data
            .nodes
            .into_iter()
            .map(|node| {
                let mut fields = Map::new();
                for (key, value) in &node.properties {
                    fields.insert(key.clone(), value.to_json());
                }
                fields.insert("id".into(), Value::String(node.id.to_string()));
                fields.insert("label".into(), Value::String(node.label));
                fields.insert("type".into(), Value::String(node.kind.to_string()));
                json!({ "data": fields })
            })
            .collect();

        let edges: Vec<Value> = data
            .edges
            .into_iter()
            .map(|edge| {
                json!({
                    "data": {
                        "source": edge.source,
                        "target": edge.target,
                        "relationship": edge.relationship,
                        "weight": edge.weight,
                    }
                })
            })
            .collect();

        json!({ "elements": { "nodes": nodes, "edges": edges } })
    }
}
