//! Error types for the learngraph SDK

use learngraph::{GraphError, PersistenceError};
use thiserror::Error;

/// Errors that can occur when using the learngraph SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// The server answered with an error status
    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Request rejected before it was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Graph operation failed (embedded mode)
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Saving the graph failed (embedded mode)
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SdkError {
    /// Whether the error means the topic or connection does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            SdkError::Api { status, .. } => *status == 404,
            SdkError::Graph(GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_, _)) => true,
            _ => false,
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
