//! Graph topology analysis algorithms
//!
//! Topological ordering (Kahn) and longest-path layering.

use super::common::{GraphView, NodeId};
use std::collections::VecDeque;

/// Result of a topological sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// Nodes in dependency order (every edge points forward)
    pub order: Vec<NodeId>,
    /// Nodes that sit on or behind a cycle, in index order
    pub cyclic: Vec<NodeId>,
}

impl TopologicalOrder {
    pub fn is_acyclic(&self) -> bool {
        self.cyclic.is_empty()
    }
}

/// Kahn's algorithm, returning dense indices.
///
/// Ready nodes are released in index order, so the result is deterministic.
pub(crate) fn kahn_indices(view: &GraphView) -> (Vec<usize>, Vec<usize>) {
    let n = view.node_count;
    let mut in_degree: Vec<usize> = (0..n).map(|i| view.in_degree(i)).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &v in view.successors(u) {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    let cyclic = (0..n).filter(|&i| in_degree[i] > 0).collect();
    (order, cyclic)
}

/// Topological order of the view.
pub fn topological_order(view: &GraphView) -> TopologicalOrder {
    let (order, cyclic) = kahn_indices(view);
    TopologicalOrder {
        order: order.into_iter().map(|i| view.index_to_node[i]).collect(),
        cyclic: cyclic.into_iter().map(|i| view.index_to_node[i]).collect(),
    }
}

/// Layer of every node (by index): sources are layer 0, every other acyclic
/// node sits one below its deepest predecessor. Nodes in cycles share the
/// layer after the deepest acyclic one.
pub fn longest_path_layers(view: &GraphView) -> Vec<usize> {
    let (order, cyclic) = kahn_indices(view);
    let mut layers = vec![0usize; view.node_count];

    for &u in &order {
        for &v in view.successors(u) {
            layers[v] = layers[v].max(layers[u] + 1);
        }
    }

    if !cyclic.is_empty() {
        let next = order.iter().map(|&i| layers[i] + 1).max().unwrap_or(0);
        for idx in cyclic {
            layers[idx] = next;
        }
    }

    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topological_order_dag() {
        // 0->1, 0->2, 1->3, 2->3
        let view = GraphView::from_edges(
            4,
            &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)],
            false,
        );
        let result = topological_order(&view);
        assert!(result.is_acyclic());
        assert_eq!(result.order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_topological_order_with_cycle() {
        // 0->1->2->1
        let view = GraphView::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 1, 1.0)], false);
        let result = topological_order(&view);
        assert_eq!(result.order, vec![0]);
        assert_eq!(result.cyclic, vec![1, 2]);
    }

    #[test]
    fn test_longest_path_layers() {
        // 0->1->2 and 0->2: node 2 is on layer 2, not 1
        let view = GraphView::from_edges(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)], false);
        let layers = longest_path_layers(&view);
        assert_eq!(layers, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_layers_for_cycle_members() {
        let view = GraphView::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 1, 1.0)], false);
        let layers = longest_path_layers(&view);
        assert_eq!(layers, vec![0, 1, 1]);
    }
}
