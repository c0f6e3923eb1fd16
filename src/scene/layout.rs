//! Layered layout for the pulse renderer
//!
//! Nodes are arranged in vertical layers spread evenly across the surface
//! width. Within a layer, nodes are spaced evenly inside a horizontal band that
//! leaves a configured inset above and below.
//!
//! Positions are deterministic for a given surface size and configuration;
//! initial activation, clock and phase come from the injected random source
//! so two layouts of the same surface do not look identical.

use std::f64::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RendererConfig;

/// Upper bound for a node's initial activation
const INITIAL_ACTIVATION_MAX: f64 = 0.6;
/// Upper bound for a node's initial clock, in milliseconds
const INITIAL_CLOCK_MAX: f64 = 2000.0;
/// Lowest idle baseline
const BASELINE_MIN: f64 = 0.2;
/// Spread of idle baselines above the minimum
const BASELINE_SPREAD: f64 = 0.3;

/// 2D position/vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another position
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }

    /// Point halfway between this position and another
    pub fn midpoint(&self, other: &Position) -> Position {
        Position::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// A point in the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Position in surface pixels, fixed until the next layout
    pub position: Position,
    /// Current activation level
    pub activation: f64,
    /// Animation clock in milliseconds
    pub clock: f64,
    /// Resting activation for the pulse idle policy
    pub baseline: f64,
    /// Phase offset for the pulse idle policy, in radians
    pub phase: f64,
}

/// One vertical slice of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Shared horizontal position
    pub x: f64,
    /// Nodes from top to bottom
    pub nodes: Vec<Node>,
}

impl Layer {
    /// Number of nodes in this layer
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the layer holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Horizontal position of layer `index` out of `layers`
pub fn layer_x(index: usize, layers: usize, width: f64) -> f64 {
    ((index as f64 + 0.5) / layers as f64) * width
}

/// Vertical position of node `index` out of `count` within the inset band
pub fn node_y(index: usize, count: usize, height: f64, inset: f64) -> f64 {
    let band = height * (1.0 - 2.0 * inset);
    ((index as f64 + 0.5) / count as f64) * band + height * inset
}

/// Build the full set of layers for a surface
///
/// Returns a fresh vector every call; nothing from a previous layout survives.
pub fn layout_layers<R: Rng + ?Sized>(
    config: &RendererConfig,
    width: f64,
    height: f64,
    rng: &mut R,
) -> Vec<Layer> {
    let mut layers = Vec::with_capacity(config.layers);

    for li in 0..config.layers {
        let x = layer_x(li, config.layers, width);
        let count = config.nodes_in_layer(li);
        let mut nodes = Vec::with_capacity(count);

        for ni in 0..count {
            let y = node_y(ni, count, height, config.vertical_inset);
            nodes.push(Node {
                position: Position::new(x, y),
                activation: config
                    .activation
                    .clamp(rng.gen_range(0.0..INITIAL_ACTIVATION_MAX)),
                clock: rng.gen_range(0.0..INITIAL_CLOCK_MAX),
                baseline: BASELINE_MIN + rng.gen_range(0.0..BASELINE_SPREAD),
                phase: rng.gen_range(0.0..TAU),
            });
        }

        layers.push(Layer { x, nodes });
    }

    layers
}
