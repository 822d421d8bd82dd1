//! Graph layout algorithms for the dashboard
//!
//! All layouts return one position per dense index, centred on the origin and
//! scaled into `[-1, 1]` on both axes.
//!
//! - Fruchterman & Reingold (1991): force-directed layout
//! - Sugiyama et al. (1981): layered layout for DAGs

use super::common::GraphView;
use super::topology::longest_path_layers;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Force-directed layout configuration
#[derive(Debug, Clone)]
pub struct SpringConfig {
    /// Optimal distance between nodes
    pub k: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Seed for the initial random placement
    pub seed: u64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            k: 1.0,
            iterations: 50,
            seed: 42,
        }
    }
}

/// Nodes evenly spaced on the unit circle, starting at angle zero.
pub fn circular_layout(node_count: usize) -> Vec<Position> {
    if node_count == 1 {
        return vec![Position::default()];
    }

    (0..node_count)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * (i as f64 / node_count as f64);
            Position::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Fruchterman-Reingold force-directed layout.
///
/// Edge direction is ignored for attraction. The same view and config always
/// produce the same positions.
pub fn spring_layout(view: &GraphView, config: &SpringConfig) -> Vec<Position> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Position::default()];
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut pos: Vec<Position> = (0..n)
        .map(|_| Position::new(rng.gen::<f64>(), rng.gen::<f64>()))
        .collect();

    let mut adjacent = vec![vec![false; n]; n];
    for u in 0..n {
        for &v in view.successors(u) {
            adjacent[u][v] = true;
            adjacent[v][u] = true;
        }
    }

    let k = if config.k > 0.0 { config.k } else { (1.0 / n as f64).sqrt() };
    let mut temperature = 0.1;
    let cooling = temperature / (config.iterations as f64 + 1.0);

    for _ in 0..config.iterations {
        let mut displacement = vec![Position::default(); n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let distance = (dx * dx + dy * dy).sqrt().max(0.01);

                let mut force = k * k / (distance * distance);
                if adjacent[i][j] {
                    force -= distance / k;
                }
                displacement[i].x += dx * force;
                displacement[i].y += dy * force;
            }
        }

        for (p, d) in pos.iter_mut().zip(&displacement) {
            let length = (d.x * d.x + d.y * d.y).sqrt().max(0.01);
            p.x += d.x * temperature / length;
            p.y += d.y * temperature / length;
        }

        temperature -= cooling;
    }

    rescale(&mut pos);
    pos
}

/// Layered layout: layer 0 on top (`y = 1`), deeper layers below; nodes of
/// one layer are spread left to right in index order.
pub fn hierarchical_layout(view: &GraphView) -> Vec<Position> {
    let n = view.node_count;
    if n == 0 {
        return Vec::new();
    }

    let layers = longest_path_layers(view);
    let depth = layers.iter().copied().max().unwrap_or(0);

    let mut layer_sizes = vec![0usize; depth + 1];
    for &layer in &layers {
        layer_sizes[layer] += 1;
    }

    let mut seen_in_layer = vec![0usize; depth + 1];
    let mut positions = Vec::with_capacity(n);
    for &layer in &layers {
        let slot = seen_in_layer[layer];
        seen_in_layer[layer] += 1;

        let count = layer_sizes[layer];
        let x = if count == 1 {
            0.0
        } else {
            -1.0 + 2.0 * slot as f64 / (count - 1) as f64
        };
        let y = if depth == 0 {
            0.0
        } else {
            1.0 - 2.0 * layer as f64 / depth as f64
        };
        positions.push(Position::new(x, y));
    }

    positions
}

/// Centre on the mean and scale so the largest coordinate magnitude is 1.
fn rescale(pos: &mut [Position]) {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p.y).sum::<f64>() / n;

    let mut lim: f64 = 0.0;
    for p in pos.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
        lim = lim.max(p.x.abs()).max(p.y.abs());
    }

    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.x /= lim;
            p.y /= lim;
        }
    }
}
