//! Persistence layer
//!
//! The graph is stored as one pretty-printed JSON document. Saves write a
//! sibling temporary file and rename it over the target, so a crash never
//! leaves a half-written document behind.

pub mod document;

pub use document::{parse_timestamp, EdgeRecord, Entry, GraphDocument, LoadReport, NodeRecord};

use crate::graph::{KnowledgeGraph, NodeId, PropertyMap, PropertyValue};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed document
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// JSON file backing a knowledge graph
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn io_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Read the raw document; `None` when the file does not exist
    pub fn load_document(&self) -> PersistenceResult<Option<GraphDocument>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let document = serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(document))
    }

    /// Load the graph; `None` when the file does not exist
    pub fn load(&self) -> PersistenceResult<Option<KnowledgeGraph>> {
        let Some(document) = self.load_document()? else {
            return Ok(None);
        };

        let (graph, report) = document.into_graph();
        info!(
            "Loaded {} nodes and {} edges from {:?} ({} records skipped)",
            report.nodes,
            report.edges,
            self.path,
            report.skipped_nodes + report.skipped_edges
        );
        Ok(Some(graph))
    }

    /// Load the graph, falling back to the example graph (when `seed` is set)
    /// or an empty one if the file does not exist yet
    pub fn load_or_seed(&self, seed: bool) -> PersistenceResult<KnowledgeGraph> {
        if let Some(graph) = self.load()? {
            return Ok(graph);
        }

        if seed {
            info!("No data file at {:?}, starting from example data", self.path);
            Ok(seed_example())
        } else {
            info!("No data file at {:?}, starting empty", self.path);
            Ok(KnowledgeGraph::new())
        }
    }

    /// Write the whole graph
    pub fn save(&self, graph: &KnowledgeGraph) -> PersistenceResult<()> {
        self.save_document(&GraphDocument::from_graph(graph))
    }

    pub fn save_document(&self, document: &GraphDocument) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(document).map_err(|source| {
            PersistenceError::Json {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        debug!(
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "saved graph to {:?}",
            self.path
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "graph.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Three topics and two connections for a first run
pub fn seed_example() -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::new();

    for (name, level, started) in [
        ("Python", "intermediate", "2024-01-01"),
        ("Flask", "beginner", "2024-02-01"),
        ("Graph Theory", "beginner", "2024-03-01"),
    ] {
        let mut properties = PropertyMap::new();
        properties.insert("level".to_string(), PropertyValue::from(level));
        properties.insert("started".to_string(), PropertyValue::from(started));
        // Ids are literals and never blank
        let _ = graph.add_node(name, "concept", properties);
    }

    let python = NodeId::new("Python");
    let _ = graph.connect(&python, &NodeId::new("Flask"), "prerequisite");
    let _ = graph.connect(&python, &NodeId::new("Graph Theory"), "related_to");
    graph
}
