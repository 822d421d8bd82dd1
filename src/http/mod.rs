//! HTTP API and dashboard

pub mod error;
pub mod extract;
pub mod handler;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use extract::{ApiJson, ApiQuery};
pub use handler::{
    LearningPathResponse, MutationResponse, NeighborsResponse, NodeDetails, PathResponse,
    StatusResponse,
};
pub use server::{router, HttpServer};
pub use state::AppState;
