//! Learning recommendations
//!
//! Suggests what to learn next by combining three heuristics over the graph:
//! topics whose prerequisites are satisfied, well connected topics, and topics
//! that bridge otherwise separate areas. Each heuristic contributes at most
//! `limit` candidates; candidates are merged per topic keeping the best score.

use crate::algo;
use crate::graph::{KnowledgeGraph, LearningStatus, Node, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

const PREREQUISITE_POINTS: f64 = 10.0;
const CONNECTION_POINTS: f64 = 5.0;
const BRIDGING_POINTS: f64 = 100.0;

/// Which heuristic produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Prerequisite,
    Connectivity,
    Bridging,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Prerequisite => "prerequisite",
            Strategy::Connectivity => "connectivity",
            Strategy::Bridging => "bridging",
        };
        write!(f, "{}", name)
    }
}

/// A suggested topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub node: NodeId,
    pub reason: String,
    pub score: f64,
    #[serde(rename = "type")]
    pub strategy: Strategy,
}

/// Generates recommendations from a borrowed graph
pub struct RecommendationEngine<'a> {
    graph: &'a KnowledgeGraph,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(graph: &'a KnowledgeGraph) -> Self {
        Self { graph }
    }

    /// Up to `limit` recommendations, best first.
    ///
    /// Equal scores keep the order in which topics were first suggested.
    pub fn recommend(&self, limit: usize) -> Vec<Recommendation> {
        if limit == 0 {
            return Vec::new();
        }

        let candidates = self
            .by_prerequisites(limit)
            .into_iter()
            .chain(self.by_connectivity(limit))
            .chain(self.by_bridging(limit));

        let mut best: IndexMap<NodeId, Recommendation> = IndexMap::new();
        for candidate in candidates {
            match best.get_mut(&candidate.node) {
                Some(existing) if candidate.score > existing.score => *existing = candidate,
                Some(_) => {}
                None => {
                    best.insert(candidate.node.clone(), candidate);
                }
            }
        }

        let mut merged: Vec<Recommendation> = best.into_values().collect();
        merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        merged.truncate(limit);
        merged
    }

    /// Topics with at least one prerequisite, all of which are satisfied.
    ///
    /// A prerequisite counts as satisfied unless it is explicitly planned.
    pub fn by_prerequisites(&self, limit: usize) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for node in self.graph.nodes().filter(|n| is_candidate(n)) {
            let prerequisites = self.graph.prerequisites_of(&node.id);
            if prerequisites.is_empty() {
                continue;
            }

            let satisfied = prerequisites.iter().all(|id| {
                self.graph
                    .get_node(id)
                    .map(|p| p.status() != LearningStatus::Planned)
                    .unwrap_or(false)
            });
            if !satisfied {
                continue;
            }

            let names: Vec<&str> = prerequisites.iter().map(|id| id.as_str()).collect();
            recommendations.push(Recommendation {
                node: node.id.clone(),
                reason: format!("Prerequisites met: {}", names.join(", ")),
                score: prerequisites.len() as f64 * PREREQUISITE_POINTS,
                strategy: Strategy::Prerequisite,
            });

            if recommendations.len() == limit {
                break;
            }
        }

        recommendations
    }

    /// Best connected topics among the `2 * limit` highest degrees
    pub fn by_connectivity(&self, limit: usize) -> Vec<Recommendation> {
        self.graph
            .most_connected(limit.saturating_mul(2))
            .into_iter()
            .filter(|c| c.connections > 0)
            .filter(|c| self.graph.get_node(&c.node).map(is_candidate).unwrap_or(false))
            .take(limit)
            .map(|c| Recommendation {
                reason: format!("Highly connected ({} connections)", c.connections),
                score: c.connections as f64 * CONNECTION_POINTS,
                node: c.node,
                strategy: Strategy::Connectivity,
            })
            .collect()
    }

    /// Topics with the highest normalized betweenness centrality
    pub fn by_bridging(&self, limit: usize) -> Vec<Recommendation> {
        let projected = algo::build_view(self.graph, None);
        let centrality = algo::betweenness_centrality(&projected.view, true);

        let mut ranked: Vec<(&NodeId, f64)> = projected
            .ids()
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, centrality.get(&(idx as u64)).copied().unwrap_or(0.0)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        ranked
            .into_iter()
            .take(limit)
            .filter(|(_, value)| *value > 0.0)
            .filter(|(id, _)| self.graph.get_node(id).map(is_candidate).unwrap_or(false))
            .map(|(id, value)| Recommendation {
                node: id.clone(),
                reason: "Bridges different knowledge areas".to_string(),
                score: value * BRIDGING_POINTS,
                strategy: Strategy::Bridging,
            })
            .collect()
    }
}

/// Completed topics are never suggested again
fn is_candidate(node: &Node) -> bool {
    node.status() != LearningStatus::Completed
}
