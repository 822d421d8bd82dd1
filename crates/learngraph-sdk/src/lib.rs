//! learngraph SDK: client library for a learngraph knowledge graph
//!
//! Provides two client implementations:
//!
//! - **`EmbeddedClient`**: in-process, no network. Works on a `KnowledgeGraph`
//!   directly. Ideal for tests and embedded applications.
//!
//! - **`RemoteClient`**: connects to a running learngraph server via HTTP.
//!
//! Both implement the `LearnGraphClient` trait for a unified API.
//!
//! # Quick Start
//!
//! ```rust
//! use learngraph_sdk::{EmbeddedClient, LearnGraphClient, NewEdge, NewNode};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = EmbeddedClient::new();
//!
//!     client.add_node(NewNode::new("Python")).await.unwrap();
//!     client.add_node(NewNode::new("Flask")).await.unwrap();
//!     client
//!         .add_edge(NewEdge::new("Python", "Flask").relationship("prerequisite"))
//!         .await
//!         .unwrap();
//!
//!     let recs = client.recommendations(Some(3)).await.unwrap();
//!     println!("Learn next: {}", recs[0].node);
//! }
//! ```

pub mod client;
pub mod embedded;
pub mod error;
pub mod models;
pub mod remote;

pub use client::LearnGraphClient;
pub use embedded::EmbeddedClient;
pub use error::{SdkError, SdkResult};
pub use models::{
    GraphData, GraphStatistics, LearningPathResponse, MutationResponse, NeighborsResponse,
    NewEdge, NewNode, NodeDetails, PathResponse, Recommendation, ServerStatus,
};
pub use remote::RemoteClient;

// Graph types (re-exported from learngraph core)
pub use learngraph::graph::{
    KnowledgeGraph, LearningStatus, Node, NodeId, NodeKind, PropertyMap, PropertyValue,
    Relationship,
};
pub use learngraph::VERSION;
