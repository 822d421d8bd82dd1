//! Knowledge graph data model
//!
//! A directed graph of learning topics:
//! - Nodes are topics keyed by name, with a kind and free-form properties
//! - Edges are typed relationships, at most one per ordered pair
//! - Storage is in memory with insertion-ordered indices

pub mod edge;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, DEFAULT_WEIGHT};
pub use node::{LearningStatus, Node, STATUS_PROPERTY};
pub use property::{PropertyMap, PropertyValue};
pub use store::{
    ConnectionCount, EdgeUpsert, GraphError, GraphResult, GraphStatistics, KnowledgeGraph,
    NodeUpsert,
};
pub use types::{NodeId, NodeKind, Relationship};
