pub mod common;
pub mod centrality;
pub mod community;
pub mod layout;
pub mod pathfinding;
pub mod topology;

pub use common::{GraphView, NodeId};
pub use centrality::{betweenness_centrality, degree_centrality};
pub use community::{weakly_connected_components, WccResult};
pub use layout::{circular_layout, hierarchical_layout, spring_layout, Position, SpringConfig};
pub use pathfinding::{bfs, dijkstra, PathResult};
pub use topology::{longest_path_layers, topological_order, TopologicalOrder};
