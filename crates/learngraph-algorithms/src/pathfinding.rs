//! Pathfinding algorithms
//!
//! Unweighted (BFS) and weighted (Dijkstra) shortest paths over directed edges.

use super::common::{GraphView, NodeId};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// A path found between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    /// Nodes from source to target inclusive
    pub path: Vec<NodeId>,
    /// Hop count for [`bfs`], summed weight for [`dijkstra`]
    pub cost: f64,
}

const NO_PARENT: usize = usize::MAX;

/// Walk parent links back from `target`; `parent[source] == NO_PARENT`
fn trace(view: &GraphView, parent: &[usize], target: usize) -> Vec<NodeId> {
    let mut path = vec![view.index_to_node[target]];
    let mut idx = target;
    while parent[idx] != NO_PARENT {
        idx = parent[idx];
        path.push(view.index_to_node[idx]);
    }
    path.reverse();
    path
}

/// Fewest-hops directed path.
///
/// Successors are explored in CSR order, so among equally short paths the one
/// using earlier-inserted edges wins.
pub fn bfs(view: &GraphView, source: NodeId, target: NodeId) -> Option<PathResult> {
    let from = *view.node_to_index.get(&source)?;
    let to = *view.node_to_index.get(&target)?;

    let mut seen = vec![false; view.node_count];
    let mut parent = vec![NO_PARENT; view.node_count];
    let mut queue = VecDeque::from([from]);
    seen[from] = true;

    while let Some(current) = queue.pop_front() {
        if current == to {
            let path = trace(view, &parent, to);
            return Some(PathResult {
                source,
                target,
                cost: (path.len() - 1) as f64,
                path,
            });
        }

        for &next in view.successors(current) {
            if !seen[next] {
                seen[next] = true;
                parent[next] = current;
                queue.push_back(next);
            }
        }
    }

    None
}

/// Heap entry ordered so the cheapest pops first
#[derive(Copy, Clone, PartialEq)]
struct Frontier {
    cost: f64,
    idx: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cheapest directed path by edge weight.
///
/// Unweighted views count every edge as 1.0. Negative weights are skipped.
pub fn dijkstra(view: &GraphView, source: NodeId, target: NodeId) -> Option<PathResult> {
    let from = *view.node_to_index.get(&source)?;
    let to = *view.node_to_index.get(&target)?;

    let mut dist = vec![f64::INFINITY; view.node_count];
    let mut parent = vec![NO_PARENT; view.node_count];
    let mut heap = BinaryHeap::from([Frontier { cost: 0.0, idx: from }]);
    dist[from] = 0.0;

    while let Some(Frontier { cost, idx }) = heap.pop() {
        if idx == to {
            return Some(PathResult {
                source,
                target,
                path: trace(view, &parent, to),
                cost,
            });
        }
        if cost > dist[idx] {
            continue;
        }

        let weights = view.weights(idx);
        for (i, &next) in view.successors(idx).iter().enumerate() {
            let weight = weights.map_or(1.0, |w| w[i]);
            if weight < 0.0 {
                continue;
            }
            let next_cost = cost + weight;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                parent[next] = idx;
                heap.push(Frontier {
                    cost: next_cost,
                    idx: next,
                });
            }
        }
    }

    None
}
