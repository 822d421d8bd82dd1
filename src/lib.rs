//! learngraph: personal knowledge graph and learning tracker
//!
//! Topics you study (concepts, resources, projects, skills) are nodes of a
//! directed graph; typed edges say how they relate. On top of the graph sit a
//! "what to learn next" recommender, dashboard layouts, JSON persistence and
//! an HTTP API.
//!
//! ## Example Usage
//!
//! ```rust
//! use learngraph::graph::{KnowledgeGraph, NodeId, PropertyMap};
//! use learngraph::recommend::RecommendationEngine;
//!
//! let mut graph = KnowledgeGraph::new();
//! graph.add_node("Python", "concept", PropertyMap::new()).unwrap();
//! graph.add_node("Flask", "concept", PropertyMap::new()).unwrap();
//! graph
//!     .connect(&NodeId::new("Python"), &NodeId::new("Flask"), "prerequisite")
//!     .unwrap();
//!
//! let recs = RecommendationEngine::new(&graph).recommend(5);
//! assert_eq!(recs[0].node, NodeId::new("Flask"));
//! assert_eq!(recs[0].reason, "Prerequisites met: Python");
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod graph;
pub mod http;
pub mod logging;
pub mod persistence;
pub mod recommend;
pub mod visual;

// Re-export main types for convenience
pub use graph::{
    Edge, EdgeUpsert, GraphError, GraphResult, GraphStatistics, KnowledgeGraph, LearningStatus,
    Node, NodeId, NodeKind, NodeUpsert, PropertyMap, PropertyValue, Relationship,
};

pub use config::{AppConfig, ConfigError, ConfigResult};

pub use persistence::{GraphDocument, JsonStore, PersistenceError, PersistenceResult};

pub use recommend::{Recommendation, RecommendationEngine, Strategy};

pub use visual::{GraphData, GraphVisualizer, Layout};

pub use http::{AppState, HttpServer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
