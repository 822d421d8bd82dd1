//! RemoteClient against a real server on an ephemeral port

use learngraph::config::RecommendationConfig;
use learngraph::http::{router, AppState};
use learngraph::persistence::{seed_example, JsonStore};
use learngraph_sdk::{LearnGraphClient, NewEdge, NewNode, NodeId, RemoteClient, SdkError};
use tempfile::TempDir;

async fn spawn_server(dir: &TempDir) -> RemoteClient {
    let store = JsonStore::new(dir.path().join("graph.json"));
    let state = AppState::new(seed_example(), store, RecommendationConfig::default());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    RemoteClient::new(&format!("http://{}", addr))
}

#[tokio::test]
async fn test_remote_status_and_stats() {
    let dir = TempDir::new().unwrap();
    let client = spawn_server(&dir).await;

    assert_eq!(client.ping().await.unwrap(), "PONG");
    let status = client.status().await.unwrap();
    assert_eq!(status.storage.nodes, 3);

    let stats = client.stats(2).await.unwrap();
    assert_eq!(stats.total_edges, 2);
    assert_eq!(stats.most_connected.len(), 2);
    assert_eq!(stats.most_connected[0].node, NodeId::new("Python"));
}

#[tokio::test]
async fn test_remote_mutations_are_saved() {
    let dir = TempDir::new().unwrap();
    let client = spawn_server(&dir).await;

    let added = client
        .add_node(NewNode::new("Web Apps").kind("project"))
        .await
        .unwrap();
    assert_eq!(added.message, "Node Web Apps added");

    let edge = client
        .add_edge(NewEdge::new("Flask", "Web Apps").relationship("uses"))
        .await
        .unwrap();
    assert_eq!(edge.message, "Edge added between Flask and Web Apps");

    let path = client.find_path("Python", "Web Apps").await.unwrap();
    assert_eq!(path.path.map(|p| p.len()), Some(3));

    let details = client.get_node("Web Apps").await.unwrap();
    assert_eq!(details.node.kind.as_str(), "project");
    assert_eq!(details.degree, 1);

    let saved = JsonStore::new(dir.path().join("graph.json"))
        .load()
        .unwrap()
        .unwrap();
    assert_eq!(saved.node_count(), 4);
    assert_eq!(saved.edge_count(), 3);
}

#[tokio::test]
async fn test_remote_errors() {
    let dir = TempDir::new().unwrap();
    let client = spawn_server(&dir).await;

    let err = client.get_node("Graph Theory 2").await.unwrap_err();
    assert!(err.is_not_found());

    let err = client
        .add_edge(NewEdge::new("Python", "Python"))
        .await
        .unwrap_err();
    match err {
        SdkError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("itself"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_remote_learning_path_with_spaces() {
    let dir = TempDir::new().unwrap();
    let client = spawn_server(&dir).await;

    let learning = client.learning_path("Flask").await.unwrap();
    assert_eq!(learning.path, vec![NodeId::new("Python"), NodeId::new("Flask")]);

    let neighbors = client.neighbors("Graph Theory").await.unwrap();
    assert_eq!(neighbors.predecessors, vec![NodeId::new("Python")]);
}
