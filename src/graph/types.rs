//! Core type definitions for the knowledge graph

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a node: the topic name itself (e.g. "Graph Theory")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An id is usable when it has visible characters
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Node category (e.g. "concept", "resource", "project", "skill")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeKind(String);

impl NodeKind {
    pub const CONCEPT: &'static str = "concept";
    pub const RESOURCE: &'static str = "resource";
    pub const PROJECT: &'static str = "project";
    pub const SKILL: &'static str = "skill";

    pub fn new(kind: impl Into<String>) -> Self {
        NodeKind(kind.into())
    }

    pub fn concept() -> Self {
        NodeKind::new(Self::CONCEPT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-only kinds fall back to `concept`
    pub fn or_default(self) -> Self {
        if self.0.trim().is_empty() {
            Self::default()
        } else {
            self
        }
    }

    /// Whether this is one of the built-in categories
    pub fn is_builtin(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::CONCEPT | Self::RESOURCE | Self::PROJECT | Self::SKILL
        )
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        NodeKind::concept()
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        NodeKind(s)
    }
}

impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        NodeKind(s.to_string())
    }
}

/// Edge category (e.g. "prerequisite", "related_to", "uses", "learned_from")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Relationship(String);

impl Relationship {
    pub const PREREQUISITE: &'static str = "prerequisite";
    pub const RELATED_TO: &'static str = "related_to";
    pub const USES: &'static str = "uses";
    pub const LEARNED_FROM: &'static str = "learned_from";

    pub fn new(relationship: impl Into<String>) -> Self {
        Relationship(relationship.into())
    }

    pub fn prerequisite() -> Self {
        Relationship::new(Self::PREREQUISITE)
    }

    pub fn related_to() -> Self {
        Relationship::new(Self::RELATED_TO)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_prerequisite(&self) -> bool {
        self.0 == Self::PREREQUISITE
    }

    /// Whitespace-only relationships fall back to `related_to`
    pub fn or_default(self) -> Self {
        if self.0.trim().is_empty() {
            Self::default()
        } else {
            self
        }
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Relationship::related_to()
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Relationship {
    fn from(s: String) -> Self {
        Relationship(s)
    }
}

impl From<&str> for Relationship {
    fn from(s: &str) -> Self {
        Relationship(s.to_string())
    }
}
