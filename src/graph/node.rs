//! Node implementation for the knowledge graph
//!
//! A node is a topic the learner tracks: a concept, resource, project or skill.

use super::property::{PropertyMap, PropertyValue};
use super::types::{NodeId, NodeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Property key that carries learning progress
pub const STATUS_PROPERTY: &str = "status";

/// Learning progress read from a node's `status` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningStatus {
    Planned,
    InProgress,
    Completed,
    /// No status recorded, or an unrecognised one
    Unknown,
}

impl LearningStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "planned" | "not_started" | "todo" => LearningStatus::Planned,
            "learning" | "in_progress" => LearningStatus::InProgress,
            "learned" | "completed" | "done" => LearningStatus::Completed,
            _ => LearningStatus::Unknown,
        }
    }
}

/// A node in the knowledge graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    /// Category of this node
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Free-form properties (level, started, url, status, ...)
    pub properties: PropertyMap,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Create a new node without properties
    pub fn new(id: impl Into<NodeId>, kind: impl Into<NodeKind>) -> Self {
        Self::new_with_properties(id, kind, PropertyMap::new())
    }

    /// Create a new node with properties
    pub fn new_with_properties(
        id: impl Into<NodeId>,
        kind: impl Into<NodeKind>,
        properties: PropertyMap,
    ) -> Self {
        let now = Utc::now();
        Node {
            id: id.into(),
            kind: kind.into(),
            properties,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set a property value
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        let old = self.properties.insert(key.into(), value.into());
        self.touch();
        old
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Remove a property
    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        let removed = self.properties.shift_remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Check if property exists
    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Merge properties into this node; incoming keys overwrite existing ones
    pub fn merge_properties(&mut self, properties: PropertyMap) {
        for (key, value) in properties {
            self.properties.insert(key, value);
        }
        self.touch();
    }

    /// Learning progress derived from the `status` property
    pub fn status(&self) -> LearningStatus {
        self.get_property(STATUS_PROPERTY)
            .and_then(PropertyValue::as_string)
            .map(LearningStatus::parse)
            .unwrap_or(LearningStatus::Unknown)
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Update the modification timestamp
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
