//! API error responses

use crate::graph::GraphError;
use crate::persistence::PersistenceError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to save graph: {0}")]
    Storage(#[from] PersistenceError),

    #[error("Background save did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn missing(field: &str) -> Self {
        ApiError::BadRequest(format!("Missing required field '{}'", field))
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound(_, _) => {
                ApiError::NotFound(err.to_string())
            }
            GraphError::InvalidNodeId | GraphError::InvalidWeight(_) | GraphError::SelfLoop(_) => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(json!({ "success": false, "error": self.to_string() }))).into_response()
    }
}
