//! RemoteClient: network client for a running learngraph server
//!
//! Talks to the server's JSON API over HTTP.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use learngraph::graph::PropertyMap;

use crate::client::LearnGraphClient;
use crate::error::{SdkError, SdkResult};
use crate::models::{
    GraphData, GraphStatistics, LearningPathResponse, MutationResponse, NeighborsResponse,
    NewEdge, NewNode, NodeDetails, PathResponse, Recommendation, ServerStatus,
};

/// Characters left as-is in a path segment or query value (RFC 3986 unreserved)
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, UNRESERVED).to_string()
}

/// Network client that connects to a running learngraph server.
pub struct RemoteClient {
    http_base_url: String,
    http_client: Client,
}

impl RemoteClient {
    /// Create a new RemoteClient connecting to the given HTTP base URL.
    ///
    /// # Example
    /// ```no_run
    /// # use learngraph_sdk::RemoteClient;
    /// let client = RemoteClient::new("http://localhost:5000");
    /// ```
    pub fn new(http_base_url: &str) -> Self {
        Self {
            http_base_url: http_base_url.trim_end_matches('/').to_string(),
            http_client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.http_base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.http_base_url, path)
    }

    fn node_url(&self, id: &str, suffix: &str) -> String {
        self.url(&format!("/api/nodes/{}{}", encode(id), suffix))
    }

    /// Send a request and decode a JSON body, turning error statuses into
    /// `SdkError::Api` with the server's message
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> SdkResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let error_body: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| json!({ "error": "Unknown error" }));
        let message = error_body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        Err(SdkError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl LearnGraphClient for RemoteClient {
    async fn status(&self) -> SdkResult<ServerStatus> {
        self.send(self.http_client.get(self.url("/api/status"))).await
    }

    async fn graph(&self) -> SdkResult<GraphData> {
        self.send(self.http_client.get(self.url("/api/graph"))).await
    }

    async fn stats(&self, top: usize) -> SdkResult<GraphStatistics> {
        let url = self.url(&format!("/api/stats?top={}", top));
        self.send(self.http_client.get(url)).await
    }

    async fn recommendations(&self, limit: Option<usize>) -> SdkResult<Vec<Recommendation>> {
        let url = match limit {
            Some(limit) => self.url(&format!("/api/recommendations?limit={}", limit)),
            None => self.url("/api/recommendations"),
        };
        self.send(self.http_client.get(url)).await
    }

    async fn add_node(&self, node: NewNode) -> SdkResult<MutationResponse> {
        let request = self.http_client.post(self.url("/api/nodes")).json(&node);
        self.send(request).await
    }

    async fn get_node(&self, id: &str) -> SdkResult<NodeDetails> {
        self.send(self.http_client.get(self.node_url(id, ""))).await
    }

    async fn update_node(
        &self,
        id: &str,
        properties: PropertyMap,
        kind: Option<String>,
    ) -> SdkResult<MutationResponse> {
        let body = json!({ "type": kind, "properties": properties });
        let request = self.http_client.patch(self.node_url(id, "")).json(&body);
        self.send(request).await
    }

    async fn remove_node(&self, id: &str) -> SdkResult<MutationResponse> {
        self.send(self.http_client.delete(self.node_url(id, ""))).await
    }

    async fn add_edge(&self, edge: NewEdge) -> SdkResult<MutationResponse> {
        let request = self.http_client.post(self.url("/api/edges")).json(&edge);
        self.send(request).await
    }

    async fn remove_edge(&self, source: &str, target: &str) -> SdkResult<MutationResponse> {
        let body = json!({ "source": source, "target": target });
        let request = self.http_client.delete(self.url("/api/edges")).json(&body);
        self.send(request).await
    }

    async fn neighbors(&self, id: &str) -> SdkResult<NeighborsResponse> {
        self.send(self.http_client.get(self.node_url(id, "/neighbors")))
            .await
    }

    async fn find_path(&self, source: &str, target: &str) -> SdkResult<PathResponse> {
        let url = self.url(&format!(
            "/api/path?source={}&target={}",
            encode(source),
            encode(target)
        ));
        self.send(self.http_client.get(url)).await
    }

    async fn learning_path(&self, id: &str) -> SdkResult<LearningPathResponse> {
        self.send(self.http_client.get(self.node_url(id, "/learning-path")))
            .await
    }
}
