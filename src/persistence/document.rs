//! On-disk JSON document
//!
//! The document is the plain `{ "nodes": [...], "edges": [...] }` shape the
//! dashboard has always written. Reading is lenient: legacy field names are
//! accepted and records that cannot be applied are skipped.

use crate::graph::{
    Edge, GraphError, KnowledgeGraph, Node, NodeId, NodeKind, PropertyMap, Relationship,
    DEFAULT_WEIGHT,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Formats tried, in order, for timestamps written without an offset.
/// Such values are read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    #[serde(default, alias = "node_id")]
    pub id: Option<String>,
    #[serde(
        default,
        rename = "type",
        alias = "node_type",
        deserialize_with = "lenient_text"
    )]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: PropertyMap,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeRecord {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub relationship: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// One element of the `nodes` or `edges` array. Anything that does not fit
/// the record shape is kept as raw JSON so the rest of the document still
/// loads; unreadable entries are skipped when the graph is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Record(T),
    Unreadable(Value),
}

impl<T> From<T> for Entry<T> {
    fn from(record: T) -> Self {
        Entry::Record(record)
    }
}

/// Serialized form of a whole graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Entry<NodeRecord>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<Entry<EdgeRecord>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strings pass through; any other JSON value reads as absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// Parse an RFC 3339 timestamp, or a naive `YYYY-MM-DDTHH:MM:SS[.ffffff]`
/// one taken as UTC. `None` when neither fits.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// What happened while turning a document into a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    pub skipped_nodes: usize,
    pub skipped_edges: usize,
}

impl GraphDocument {
    /// Snapshot a graph, nodes and edges in insertion order
    pub fn from_graph(graph: &KnowledgeGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| {
                Entry::from(NodeRecord {
                    id: Some(node.id.to_string()),
                    kind: Some(node.kind.to_string()),
                    properties: node.properties.clone(),
                    created_at: Some(node.created_at),
                    updated_at: Some(node.updated_at),
                })
            })
            .collect();

        let edges = graph
            .edges()
            .map(|edge| {
                Entry::from(EdgeRecord {
                    source: Some(edge.source.to_string()),
                    target: Some(edge.target.to_string()),
                    relationship: Some(edge.relationship.to_string()),
                    weight: Some(edge.weight),
                    created_at: Some(edge.created_at),
                })
            })
            .collect();

        GraphDocument { nodes, edges }
    }

    /// Build a fresh graph. Nodes are applied first, then edges; a repeated
    /// node or edge updates the earlier one.
    pub fn into_graph(self) -> (KnowledgeGraph, LoadReport) {
        let mut graph = KnowledgeGraph::new();
        let mut report = LoadReport::default();

        for entry in self.nodes {
            let Entry::Record(record) = entry else {
                warn!("Skipping unreadable node record");
                report.skipped_nodes += 1;
                continue;
            };
            match apply_node(&mut graph, record) {
                Ok(()) => report.nodes += 1,
                Err(e) => {
                    warn!("Skipping node record: {}", e);
                    report.skipped_nodes += 1;
                }
            }
        }

        for entry in self.edges {
            let Entry::Record(record) = entry else {
                warn!("Skipping unreadable edge record");
                report.skipped_edges += 1;
                continue;
            };
            match apply_edge(&mut graph, record) {
                Ok(()) => report.edges += 1,
                Err(e) => {
                    warn!("Skipping edge record: {}", e);
                    report.skipped_edges += 1;
                }
            }
        }

        (graph, report)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn apply_node(graph: &mut KnowledgeGraph, record: NodeRecord) -> Result<(), GraphError> {
    let id = non_empty(record.id).ok_or(GraphError::InvalidNodeId)?;
    let kind = non_empty(record.kind)
        .map(NodeKind::new)
        .unwrap_or_default();
    let id = NodeId::new(id);

    if graph.has_node(&id) {
        graph.add_node(id, kind, record.properties)?;
        return Ok(());
    }

    let mut node = Node::new_with_properties(id, kind, record.properties);
    if let Some(created_at) = record.created_at {
        node.created_at = created_at;
        node.updated_at = record.updated_at.unwrap_or(created_at);
    }
    graph.insert_recovered_node(node)
}

fn apply_edge(graph: &mut KnowledgeGraph, record: EdgeRecord) -> Result<(), GraphError> {
    let source = NodeId::new(non_empty(record.source).ok_or(GraphError::InvalidNodeId)?);
    let target = NodeId::new(non_empty(record.target).ok_or(GraphError::InvalidNodeId)?);
    let relationship = non_empty(record.relationship)
        .map(Relationship::new)
        .unwrap_or_default();
    let weight = record.weight.unwrap_or(DEFAULT_WEIGHT);

    if graph.has_edge(&source, &target) {
        graph.add_edge(&source, &target, relationship, weight)?;
        return Ok(());
    }

    let mut edge = Edge::new(source, target, relationship, weight);
    if let Some(created_at) = record.created_at {
        edge.created_at = created_at;
    }
    graph.insert_recovered_edge(edge)
}
