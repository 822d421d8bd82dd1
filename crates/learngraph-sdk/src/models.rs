//! Data models for the learngraph SDK
//!
//! Response bodies are the server's own types, so both clients return exactly
//! what the HTTP API serializes.

use learngraph::graph::PropertyMap;
use serde::{Deserialize, Serialize};

pub use learngraph::http::{
    LearningPathResponse, MutationResponse, NeighborsResponse, NodeDetails, PathResponse,
    StatusResponse as ServerStatus,
};
pub use learngraph::{GraphData, GraphStatistics, Recommendation};

/// A topic to create or update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewNode {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub properties: PropertyMap,
}

impl NewNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn property(
        mut self,
        key: impl Into<String>,
        value: impl Into<learngraph::PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A connection to create or update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEdge {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl NewEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: None,
            weight: None,
        }
    }

    pub fn relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = Some(relationship.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}
