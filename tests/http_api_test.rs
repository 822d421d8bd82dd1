use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use learngraph::config::RecommendationConfig;
use learngraph::http::router;
use learngraph::persistence::seed_example;
use learngraph::{AppState, JsonStore, KnowledgeGraph};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    data_file: PathBuf,
    _dir: TempDir,
}

fn test_app(graph: KnowledgeGraph) -> TestApp {
    let dir = TempDir::new().unwrap();
    let data_file = dir.path().join("graph.json");
    let state = AppState::new(
        graph,
        JsonStore::new(&data_file),
        RecommendationConfig::default(),
    );
    TestApp {
        app: router(state),
        data_file,
        _dir: dir,
    }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_status_and_graph() {
    let t = test_app(seed_example());

    let (status, body) = call(&t.app, Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"]["nodes"], 3);
    assert_eq!(body["storage"]["edges"], 2);

    let (status, body) = call(&t.app, Method::GET, "/api/graph", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(body["nodes"][0]["id"], "Python");
    assert_eq!(body["edges"][0]["relationship"], "prerequisite");

    // Reading never writes the data file
    assert!(!t.data_file.exists());
}

#[tokio::test]
async fn test_dashboard_is_served() {
    let t = test_app(KnowledgeGraph::new());
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("<html"));
}

#[tokio::test]
async fn test_add_node_then_update() {
    let t = test_app(KnowledgeGraph::new());

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/api/nodes",
        Some(json!({"id": "Rust", "type": "skill", "properties": {"level": "beginner"}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Node Rust added");
    assert!(t.data_file.exists());

    let (status, _) = call(
        &t.app,
        Method::POST,
        "/api/nodes",
        Some(json!({"id": "Rust", "properties": {"status": "learning"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&t.app, Method::GET, "/api/nodes/Rust", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "Rust");
    assert_eq!(body["type"], "concept");
    assert_eq!(body["properties"]["level"], "beginner");
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["degree"], 0);

    let (status, body) = call(
        &t.app,
        Method::PATCH,
        "/api/nodes/Rust",
        Some(json!({"type": "skill", "properties": {"status": "done"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Node Rust updated");

    let saved: Value =
        serde_json::from_str(&std::fs::read_to_string(&t.data_file).unwrap()).unwrap();
    assert_eq!(saved["nodes"][0]["type"], "skill");
    assert_eq!(saved["nodes"][0]["properties"]["status"], "done");
}

#[tokio::test]
async fn test_validation_errors() {
    let t = test_app(seed_example());

    let (status, body) = call(&t.app, Method::POST, "/api/nodes", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required field 'id'");

    let (status, _) = call(
        &t.app,
        Method::POST,
        "/api/edges",
        Some(json!({"source": "Python"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/api/edges",
        Some(json!({"source": "Python", "target": "Rust"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Node 'Rust' not found");

    let (status, _) = call(
        &t.app,
        Method::POST,
        "/api/edges",
        Some(json!({"source": "Python", "target": "Python"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&t.app, Method::GET, "/api/nodes/Rust", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&t.app, Method::GET, "/api/path?source=Python", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was mutated, so nothing was saved
    assert!(!t.data_file.exists());
}

#[tokio::test]
async fn test_malformed_requests_use_error_body() {
    let t = test_app(seed_example());

    let (status, body) = call(&t.app, Method::POST, "/api/nodes", Some(json!({"id": 42}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("id"));

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/api/edges",
        Some(json!({"source": "Python", "target": "Flask", "weight": "heavy"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = call(&t.app, Method::GET, "/api/recommendations?limit=abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, body) = call(&t.app, Method::GET, "/api/stats?top=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/nodes")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);

    assert!(!t.data_file.exists());
}

#[tokio::test]
async fn test_import_skips_unreadable_records() {
    let t = test_app(KnowledgeGraph::new());
    let document = json!({
        "nodes": [
            {"id": "Python", "properties": null, "created_at": "2024-01-01T10:00:00.123456"},
            {"id": "Flask"},
            {"id": 7}
        ],
        "edges": [
            {"source": "Python", "target": "Flask", "relationship": "prerequisite"},
            {"source": "Flask", "target": "Python", "weight": "heavy"}
        ]
    });

    let (status, body) = call(&t.app, Method::POST, "/api/import", Some(document)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"], 2);
    assert_eq!(body["skipped_nodes"], 1);
    assert_eq!(body["edges"], 1);
    assert_eq!(body["skipped_edges"], 1);

    let (_, node) = call(&t.app, Method::GET, "/api/nodes/Python", None).await;
    assert_eq!(node["created_at"], "2024-01-01T10:00:00.123456Z");
}

#[tokio::test]
async fn test_edges_and_queries() {
    let t = test_app(seed_example());

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/api/nodes",
        Some(json!({"id": "Web APIs"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/api/edges",
        Some(json!({"source": "Flask", "target": "Web APIs", "relationship": "prerequisite", "weight": 0.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Edge added between Flask and Web APIs");

    let (status, body) = call(
        &t.app,
        Method::GET,
        "/api/path?source=Python&target=Web%20APIs",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], json!(["Python", "Flask", "Web APIs"]));

    let (_, body) = call(
        &t.app,
        Method::GET,
        "/api/path?source=Web%20APIs&target=Python",
        None,
    )
    .await;
    assert!(body["path"].is_null());

    let (status, body) = call(
        &t.app,
        Method::GET,
        "/api/nodes/Web%20APIs/learning-path",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], json!(["Python", "Flask", "Web APIs"]));

    let (_, body) = call(&t.app, Method::GET, "/api/nodes/Flask/neighbors", None).await;
    assert_eq!(body["successors"], json!(["Web APIs"]));
    assert_eq!(body["predecessors"], json!(["Python"]));

    let (status, body) = call(
        &t.app,
        Method::DELETE,
        "/api/edges",
        Some(json!({"source": "Flask", "target": "Web APIs"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Edge removed between Flask and Web APIs");

    let (status, _) = call(
        &t.app,
        Method::DELETE,
        "/api/edges",
        Some(json!({"source": "Flask", "target": "Web APIs"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(&t.app, Method::DELETE, "/api/nodes/Flask", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Node Flask removed");

    let (_, body) = call(&t.app, Method::GET, "/api/stats", None).await;
    assert_eq!(body["total_nodes"], 3);
    assert_eq!(body["total_edges"], 1);
    assert_eq!(body["components"], 2);
}

#[tokio::test]
async fn test_recommendations_and_stats() {
    let t = test_app(seed_example());

    let (status, body) = call(&t.app, Method::GET, "/api/recommendations", None).await;
    assert_eq!(status, StatusCode::OK);
    let recs = body.as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["node"], "Flask");
    assert_eq!(recs[0]["type"], "prerequisite");

    let (_, body) = call(&t.app, Method::GET, "/api/recommendations?limit=1", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = call(&t.app, Method::GET, "/api/stats?top=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_nodes"], 3);
    assert_eq!(body["node_types"]["concept"], 3);
    assert_eq!(body["most_connected"], json!([{"node": "Python", "connections": 2}]));
}

#[tokio::test]
async fn test_layouts_and_cytoscape() {
    let t = test_app(seed_example());

    for layout in ["spring", "circular", "hierarchical", "unknown"] {
        let uri = format!("/api/graph/layout?layout={}", layout);
        let (status, body) = call(&t.app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let positions = body.as_object().unwrap();
        assert_eq!(positions.len(), 3);
        assert_eq!(positions["Python"].as_array().unwrap().len(), 2);
    }

    let (status, body) = call(&t.app, Method::GET, "/api/graph/cytoscape", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["elements"]["nodes"][0]["data"]["id"], "Python");
    assert_eq!(body["elements"]["edges"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_export_import() {
    let source = test_app(seed_example());
    let (status, exported) = call(&source.app, Method::GET, "/api/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exported["nodes"].as_array().unwrap().len(), 3);

    let target = test_app(KnowledgeGraph::new());
    let (status, body) = call(&target.app, Method::POST, "/api/import", Some(exported)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"], 3);
    assert_eq!(body["edges"], 2);
    assert_eq!(body["skipped_edges"], 0);
    assert!(target.data_file.exists());

    let (_, status_body) = call(&target.app, Method::GET, "/api/status", None).await;
    assert_eq!(status_body["storage"]["nodes"], 3);
}

#[tokio::test]
async fn test_save_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let state = AppState::new(
        KnowledgeGraph::new(),
        JsonStore::new(blocker.join("graph.json")),
        RecommendationConfig::default(),
    );
    let app = router(state.clone());

    let (status, body) = call(&app, Method::POST, "/api/nodes", Some(json!({"id": "Rust"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Failed to save graph"));

    // The change stays in memory
    assert_eq!(state.graph.read().await.node_count(), 1);
}
