//! Dense graph topology shared by every algorithm
//!
//! Callers project their own graph onto indices `0..n` and hand the edges
//! over; algorithms never see the caller's node type.

use std::collections::HashMap;

/// Dense node identifier
pub type NodeId = u64;

/// Compressed Sparse Row topology, with the reverse direction kept alongside
/// so predecessor walks are as cheap as successor walks.
#[derive(Debug, Clone)]
pub struct GraphView {
    pub node_count: usize,
    /// Dense index -> NodeId
    pub index_to_node: Vec<NodeId>,
    /// NodeId -> dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// `node_count + 1` offsets into `out_targets`
    pub out_offsets: Vec<usize>,
    pub out_targets: Vec<usize>,

    /// `node_count + 1` offsets into `in_sources`
    pub in_offsets: Vec<usize>,
    pub in_sources: Vec<usize>,

    /// Parallel to `out_targets` when the view is weighted
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Build a view from per-node rows of `(target, weight)`.
    ///
    /// Row order is kept, so successor and predecessor slices list
    /// neighbours in the order they were supplied.
    pub fn from_rows(rows: Vec<Vec<(usize, f64)>>, weighted: bool) -> Self {
        let node_count = rows.len();

        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut flat_weights = Vec::new();
        let mut in_counts = vec![0usize; node_count];

        out_offsets.push(0);
        for row in &rows {
            for &(target, weight) in row {
                out_targets.push(target);
                flat_weights.push(weight);
                in_counts[target] += 1;
            }
            out_offsets.push(out_targets.len());
        }

        let mut in_offsets = Vec::with_capacity(node_count + 1);
        in_offsets.push(0);
        for count in &in_counts {
            let last = in_offsets[in_offsets.len() - 1];
            in_offsets.push(last + count);
        }

        // Fill reverse adjacency by scanning sources in index order
        let mut cursor = in_offsets[..node_count].to_vec();
        let mut in_sources = vec![0usize; out_targets.len()];
        for (source, row) in rows.iter().enumerate() {
            for &(target, _) in row {
                in_sources[cursor[target]] = source;
                cursor[target] += 1;
            }
        }

        let index_to_node: Vec<NodeId> = (0..node_count as NodeId).collect();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
            weights: weighted.then_some(flat_weights),
        }
    }

    /// Build a view from `(source, target, weight)` triples
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, f64)], weighted: bool) -> Self {
        let mut rows = vec![Vec::new(); node_count];
        for &(source, target, weight) in edges {
            rows[source].push((target, weight));
        }
        Self::from_rows(rows, weighted)
    }

    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// In-degree plus out-degree
    pub fn degree(&self, idx: usize) -> usize {
        self.out_degree(idx) + self.in_degree(idx)
    }

    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.out_targets[self.out_offsets[idx]..self.out_offsets[idx + 1]]
    }

    pub fn predecessors(&self, idx: usize) -> &[usize] {
        &self.in_sources[self.in_offsets[idx]..self.in_offsets[idx + 1]]
    }

    /// Weights of the edges leaving `idx`, aligned with [`successors`](Self::successors)
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        let range = self.out_offsets[idx]..self.out_offsets[idx + 1];
        self.weights.as_deref().map(|w| &w[range])
    }

    pub fn edge_count(&self) -> usize {
        self.out_targets.len()
    }
}
