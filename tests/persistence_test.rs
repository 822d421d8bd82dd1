use learngraph::graph::{NodeId, PropertyMap, PropertyValue};
use learngraph::persistence::{seed_example, GraphDocument};
use learngraph::{JsonStore, KnowledgeGraph, PersistenceError};
use tempfile::TempDir;

fn id(s: &str) -> NodeId {
    NodeId::new(s)
}

#[test]
fn test_round_trip_keeps_order_properties_and_timestamps() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("graph.json"));

    let mut graph = seed_example();
    let mut props = PropertyMap::new();
    props.insert("hours".to_string(), PropertyValue::from(12i64));
    props.insert(
        "tags".to_string(),
        PropertyValue::from(vec![PropertyValue::from("web"), PropertyValue::from("backend")]),
    );
    graph.add_node("Django", "resource", props).unwrap();
    graph
        .add_edge(&id("Python"), &id("Django"), "prerequisite", 0.75)
        .unwrap();
    store.save(&graph).unwrap();

    let loaded = store.load().unwrap().unwrap();
    let ids: Vec<&str> = loaded.nodes().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Python", "Flask", "Graph Theory", "Django"]);

    let django = loaded.get_node(&id("Django")).unwrap();
    let original = graph.get_node(&id("Django")).unwrap();
    assert_eq!(django.kind.as_str(), "resource");
    assert_eq!(django.get_property("hours").unwrap().as_integer(), Some(12));
    assert_eq!(django.get_property("tags").unwrap().as_array().unwrap().len(), 2);
    assert_eq!(django.created_at, original.created_at);

    let edge = loaded.get_edge(&id("Python"), &id("Django")).unwrap();
    assert_eq!(edge.weight, 0.75);
    assert!(edge.relationship.is_prerequisite());
}

#[test]
fn test_lenient_document() {
    let raw = r#"{
        "nodes": [
            {"node_id": "Rust", "node_type": "skill", "properties": {"level": "beginner"}},
            {"id": "Cargo"},
            {"id": "   "},
            {"properties": {"orphan": true}}
        ],
        "edges": [
            {"source": "Rust", "target": "Cargo"},
            {"source": "Rust", "target": "Go", "relationship": "related_to"},
            {"source": "Cargo", "target": "Cargo"},
            {"source": "Rust", "target": "Cargo", "relationship": "uses", "weight": 2.0}
        ]
    }"#;

    let document: GraphDocument = serde_json::from_str(raw).unwrap();
    let (graph, report) = document.into_graph();

    assert_eq!(report.nodes, 2);
    assert_eq!(report.skipped_nodes, 2);
    assert_eq!(report.edges, 2);
    assert_eq!(report.skipped_edges, 2);

    let rust = graph.get_node(&id("Rust")).unwrap();
    assert_eq!(rust.kind.as_str(), "skill");
    assert_eq!(graph.get_node(&id("Cargo")).unwrap().kind.as_str(), "concept");

    // The later record for the same pair wins
    let edge = graph.get_edge(&id("Rust"), &id("Cargo")).unwrap();
    assert_eq!(edge.relationship.as_str(), "uses");
    assert_eq!(edge.weight, 2.0);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_naive_timestamps_are_read_as_utc() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(
        &path,
        r#"{
            "nodes": [
                {"id": "Python", "type": "concept", "properties": {"level": "intermediate"},
                 "created_at": "2024-01-01T10:00:00.123456"},
                {"id": "Flask", "created_at": "2024-02-01 09:30:00"},
                {"id": "Django", "created_at": "last tuesday"}
            ],
            "edges": [
                {"source": "Python", "target": "Flask", "relationship": "prerequisite",
                 "created_at": "2024-02-02T08:00:00"}
            ]
        }"#,
    )
    .unwrap();

    let graph = JsonStore::new(&path).load_or_seed(true).unwrap();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 1);

    let python = graph.get_node(&id("Python")).unwrap();
    assert_eq!(python.created_at.to_rfc3339(), "2024-01-01T10:00:00.123456+00:00");
    assert_eq!(python.updated_at, python.created_at);

    let flask = graph.get_node(&id("Flask")).unwrap();
    assert_eq!(flask.created_at.to_rfc3339(), "2024-02-01T09:30:00+00:00");

    // Unparseable timestamps fall back to the load time
    let django = graph.get_node(&id("Django")).unwrap();
    assert!(django.created_at > python.created_at);

    let edge = graph.get_edge(&id("Python"), &id("Flask")).unwrap();
    assert_eq!(edge.created_at.to_rfc3339(), "2024-02-02T08:00:00+00:00");
}

#[test]
fn test_null_fields_use_defaults() {
    let raw = r#"{
        "nodes": [
            {"id": "Rust", "type": null, "properties": null, "created_at": null},
            {"id": "Cargo", "properties": {"level": null}}
        ],
        "edges": [
            {"source": "Rust", "target": "Cargo", "relationship": null, "weight": null}
        ]
    }"#;

    let document: GraphDocument = serde_json::from_str(raw).unwrap();
    let (graph, report) = document.into_graph();
    assert_eq!((report.nodes, report.skipped_nodes), (2, 0));
    assert_eq!((report.edges, report.skipped_edges), (1, 0));

    let rust = graph.get_node(&id("Rust")).unwrap();
    assert_eq!(rust.kind.as_str(), "concept");
    assert!(rust.properties.is_empty());
    assert!(graph
        .get_node(&id("Cargo"))
        .unwrap()
        .get_property("level")
        .unwrap()
        .is_null());

    let edge = graph.get_edge(&id("Rust"), &id("Cargo")).unwrap();
    assert_eq!(edge.relationship.as_str(), "related_to");
    assert_eq!(edge.weight, 1.0);

    let null_sections: GraphDocument =
        serde_json::from_str(r#"{"nodes": null, "edges": null}"#).unwrap();
    assert!(null_sections.into_graph().0.is_empty());
}

#[test]
fn test_mistyped_records_are_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(
        &path,
        r#"{
            "nodes": [
                {"id": "Rust", "type": 7},
                {"id": 42},
                {"id": "Tokio", "properties": "async runtime"},
                "Serde",
                {"id": "Cargo"}
            ],
            "edges": [
                {"source": "Rust", "target": "Cargo", "weight": "heavy"},
                {"source": "Rust", "target": 3},
                [1, 2],
                {"source": "Cargo", "target": "Rust", "relationship": 5, "weight": 2}
            ]
        }"#,
    )
    .unwrap();

    let document = JsonStore::new(&path).load_document().unwrap().unwrap();
    let (graph, report) = document.into_graph();

    assert_eq!((report.nodes, report.skipped_nodes), (2, 3));
    assert_eq!((report.edges, report.skipped_edges), (1, 3));

    // A non-string kind or relationship reads as the default
    assert_eq!(graph.get_node(&id("Rust")).unwrap().kind.as_str(), "concept");
    let edge = graph.get_edge(&id("Cargo"), &id("Rust")).unwrap();
    assert_eq!(edge.relationship.as_str(), "related_to");
    assert_eq!(edge.weight, 2.0);
    assert!(!graph.has_edge(&id("Rust"), &id("Cargo")));

    // The store still opens the same file
    assert_eq!(JsonStore::new(&path).load().unwrap().unwrap().node_count(), 2);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("graph.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonStore::new(&path);
    assert!(matches!(store.load(), Err(PersistenceError::Json { .. })));
    assert!(store.load_or_seed(true).is_err());
}

#[test]
fn test_save_into_unwritable_location() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file, not a directory").unwrap();

    let store = JsonStore::new(blocker.join("graph.json"));
    let err = store.save(&KnowledgeGraph::new()).unwrap_err();
    assert!(matches!(err, PersistenceError::Io { .. }));
}

#[test]
fn test_empty_graph_document() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("graph.json"));
    store.save(&KnowledgeGraph::new()).unwrap();

    let text = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 0);
    assert_eq!(value["edges"].as_array().unwrap().len(), 0);

    assert!(store.load_or_seed(true).unwrap().is_empty());
}
