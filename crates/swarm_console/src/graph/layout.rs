//! Static force-directed layout.
//!
//! Nodes are seeded on a circle by index and relaxed for a fixed number of
//! iterations, so the same graph always lands in the same place. There is no
//! animation; callers get final positions only.

use std::f32::consts::TAU;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphPoint {
    pub x: f32,
    pub y: f32,
}

impl GraphPoint {
    pub const ZERO: GraphPoint = GraphPoint { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: GraphPoint) -> f32 {
        (self - other).length()
    }
}

impl Add for GraphPoint {
    type Output = GraphPoint;

    fn add(self, rhs: GraphPoint) -> GraphPoint {
        GraphPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for GraphPoint {
    fn add_assign(&mut self, rhs: GraphPoint) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for GraphPoint {
    type Output = GraphPoint;

    fn sub(self, rhs: GraphPoint) -> GraphPoint {
        GraphPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for GraphPoint {
    fn sub_assign(&mut self, rhs: GraphPoint) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for GraphPoint {
    type Output = GraphPoint;

    fn mul(self, rhs: f32) -> GraphPoint {
        GraphPoint::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Inverse-square push between every pair of nodes.
    pub repulsion: f32,
    /// Rest length of an edge spring.
    pub ideal_edge_length: f32,
    pub spring: f32,
    /// Pull toward the origin; keeps disconnected components close.
    pub gravity: f32,
    /// Distances below this are clamped before computing forces.
    pub min_distance: f32,
    /// Largest step a node may take in the first iteration; cools linearly.
    pub max_step: f32,
    pub iterations: usize,
    pub seed_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            repulsion: 20_000.0,
            ideal_edge_length: 110.0,
            spring: 0.08,
            gravity: 0.01,
            min_distance: 12.0,
            max_step: 40.0,
            iterations: 240,
            seed_radius: 120.0,
        }
    }
}

pub fn seed_positions(node_count: usize, config: &LayoutConfig) -> Vec<GraphPoint> {
    if node_count == 1 {
        return vec![GraphPoint::ZERO];
    }
    let radius = config.seed_radius * (1.0 + node_count as f32 / 12.0);
    (0..node_count)
        .map(|index| {
            let angle = TAU * index as f32 / node_count as f32;
            GraphPoint::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

/// Final positions for `node_count` nodes joined by `edges` (index pairs).
pub fn force_directed(
    node_count: usize,
    edges: &[(usize, usize)],
    config: &LayoutConfig,
) -> Vec<GraphPoint> {
    let mut positions = seed_positions(node_count, config);
    if node_count < 2 {
        return positions;
    }

    let iterations = config.iterations.max(1);
    let mut displacement = vec![GraphPoint::ZERO; node_count];
    for iteration in 0..iterations {
        displacement.fill(GraphPoint::ZERO);

        for i in 0..node_count {
            for j in (i + 1)..node_count {
                let (direction, distance) = separation(positions[i], positions[j], i, j, config);
                let push = direction * (config.repulsion / (distance * distance));
                displacement[i] += push;
                displacement[j] -= push;
            }
        }

        for &(source, target) in edges {
            if source == target || source >= node_count || target >= node_count {
                continue;
            }
            let (direction, distance) =
                separation(positions[target], positions[source], target, source, config);
            let pull = direction * (config.spring * (distance - config.ideal_edge_length));
            displacement[source] += pull;
            displacement[target] -= pull;
        }

        let temperature = config.max_step * (1.0 - iteration as f32 / iterations as f32);
        for (position, step) in positions.iter_mut().zip(displacement.iter()) {
            let step = *step - *position * config.gravity;
            let length = step.length();
            if length > temperature && length > 0.0 {
                *position += step * (temperature / length);
            } else {
                *position += step;
            }
        }
    }
    positions
}

/// Unit vector from `b` to `a` and their clamped distance. Coincident nodes
/// get a fixed direction derived from their indices.
fn separation(
    a: GraphPoint,
    b: GraphPoint,
    a_index: usize,
    b_index: usize,
    config: &LayoutConfig,
) -> (GraphPoint, f32) {
    let delta = a - b;
    let length = delta.length();
    let direction = if length > f32::EPSILON {
        delta * (1.0 / length)
    } else {
        let angle = (a_index * 7 + b_index * 13) as f32;
        GraphPoint::new(angle.cos(), angle.sin())
    };
    (direction, length.max(config.min_distance))
}
