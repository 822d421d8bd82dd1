//! Weakly connected components
//!
//! Direction is ignored; two nodes share a component when any chain of edges
//! joins them.

use super::common::{GraphView, NodeId};

/// Components in order of their lowest dense index
#[derive(Debug, Clone, PartialEq)]
pub struct WccResult {
    /// Members of each component, in dense index order
    pub components: Vec<Vec<NodeId>>,
    /// Component number of every dense index
    pub membership: Vec<usize>,
}

impl WccResult {
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Size of the largest component (0 for an empty graph)
    pub fn largest_component_size(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Component of a dense index
    pub fn component_of(&self, idx: usize) -> Option<usize> {
        self.membership.get(idx).copied()
    }
}

/// Disjoint sets with union by size and path halving
struct DisjointSets {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn root(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn merge(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.root(a), self.root(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut sets = DisjointSets::new(n);

    for source in 0..n {
        for &target in view.successors(source) {
            sets.merge(source, target);
        }
    }

    // Number components by first appearance so results are reproducible
    let mut number_of_root = vec![usize::MAX; n];
    let mut components: Vec<Vec<NodeId>> = Vec::new();
    let mut membership = Vec::with_capacity(n);

    for idx in 0..n {
        let root = sets.root(idx);
        if number_of_root[root] == usize::MAX {
            number_of_root[root] = components.len();
            components.push(Vec::new());
        }
        let component = number_of_root[root];
        components[component].push(view.index_to_node[idx]);
        membership.push(component);
    }

    WccResult {
        components,
        membership,
    }
}
