//! Per-surface pulse renderer
//!
//! A [`PulseRenderer`] owns everything one drawing surface needs: the
//! configuration, the surface geometry, the current layers, the pointer state
//! and the random source. Several renderers can run side by side without
//! sharing anything.
//!
//! Each call to [`PulseRenderer::tick`] advances the animation by one frame and
//! returns the commands that draw it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::falloff::{Falloff, Pointer};
use super::layout::{Layer, Node, Position, layout_layers};
use super::render::{CompositeMode, RenderCommand, RenderLinkParams, render_link, render_node};
use super::surface::Surface;
use crate::config::{IdlePolicy, RendererConfig};

/// Clamp an inter-frame gap into `[0, max]`; NaN counts as no time passing
pub fn clamp_frame_delta(dt: f64, max: f64) -> f64 {
    dt.max(0.0).min(max.max(0.0))
}

/// Turns display-refresh timestamps into clamped frame deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    last: f64,
    max_delta: f64,
}

impl FrameClock {
    /// Start the clock at `start` (milliseconds)
    pub fn new(start: f64, max_delta: f64) -> Self {
        Self {
            last: start,
            max_delta,
        }
    }

    /// Record a new timestamp and return the clamped time since the previous one
    pub fn advance(&mut self, now: f64) -> f64 {
        let dt = clamp_frame_delta(now - self.last, self.max_delta);
        self.last = now;
        dt
    }

    /// Timestamp of the most recent frame
    pub fn last(&self) -> f64 {
        self.last
    }
}

/// Animated layered network bound to one surface
#[derive(Debug)]
pub struct PulseRenderer<R: Rng = StdRng> {
    config: RendererConfig,
    surface: Surface,
    layers: Vec<Layer>,
    pointer: Pointer,
    rng: R,
    elapsed: f64,
}

impl PulseRenderer<StdRng> {
    /// Renderer with a reproducible random source
    pub fn from_seed(config: RendererConfig, surface: Surface, seed: u64) -> Self {
        Self::new(config, surface, StdRng::seed_from_u64(seed))
    }

    /// Renderer seeded from the operating system
    pub fn from_entropy(config: RendererConfig, surface: Surface) -> Self {
        Self::new(config, surface, StdRng::from_entropy())
    }
}

impl<R: Rng> PulseRenderer<R> {
    /// Create a renderer and lay out its first set of layers
    pub fn new(config: RendererConfig, surface: Surface, mut rng: R) -> Self {
        let layers = layout_layers(&config, surface.width_f(), surface.height_f(), &mut rng);
        tracing::debug!(
            width = surface.width,
            height = surface.height,
            layers = layers.len(),
            "Laid out pulse renderer"
        );
        Self {
            config,
            surface,
            layers,
            pointer: Pointer::default(),
            rng,
            elapsed: 0.0,
        }
    }

    /// Replace the surface and rebuild the layout from scratch
    pub fn resize(&mut self, surface: Surface) {
        self.surface = surface;
        self.layers = layout_layers(
            &self.config,
            surface.width_f(),
            surface.height_f(),
            &mut self.rng,
        );
        tracing::debug!(
            width = surface.width,
            height = surface.height,
            nodes = self.node_count(),
            "Rebuilt layout after resize"
        );
    }

    /// Pointer moved to `(x, y)` in surface pixels
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.pointer = Pointer { x, y, active: true };
    }

    /// Pointer moved, given client coordinates and the element's bounding box origin
    pub fn pointer_move_client(&mut self, client_x: f64, client_y: f64, rect_left: f64, rect_top: f64) {
        let pos = self
            .surface
            .client_to_surface(client_x, client_y, rect_left, rect_top);
        self.pointer_move(pos.x, pos.y);
    }

    /// Pointer left the surface
    pub fn pointer_leave(&mut self) {
        self.pointer.active = false;
    }

    /// Immediate activation burst centred on `(x, y)` in surface pixels
    pub fn excite(&mut self, x: f64, y: f64) {
        let origin = Position::new(x, y);
        let falloff = self.burst_falloff();
        let gain = self.config.burst.gain;
        let range = self.config.activation;
        let mut touched = 0usize;

        for node in self.layers.iter_mut().flat_map(|l| l.nodes.iter_mut()) {
            let boost = gain * falloff.score(node.position.distance(&origin));
            if boost > 0.0 {
                touched += 1;
            }
            node.activation = range.clamp(node.activation + boost);
        }

        tracing::trace!(x, y, touched, "Excite burst");
    }

    /// Boost a burst gives a node at `distance` surface pixels from its origin
    pub fn burst_boost(&self, distance: f64) -> f64 {
        self.config.burst.gain * self.burst_falloff().score(distance)
    }

    /// Advance the animation by `dt` milliseconds and draw the frame
    pub fn tick(&mut self, dt: f64) -> Vec<RenderCommand> {
        let dt = clamp_frame_delta(dt, self.config.max_frame_delta);
        self.elapsed += dt;

        let mut commands = Vec::with_capacity(4 + self.node_count() * 3);
        commands.push(RenderCommand::Clear {
            width: self.surface.width_f(),
            height: self.surface.height_f(),
        });

        self.draw_links(&mut commands);
        self.update_nodes(dt);

        let dpr = self.surface.dpr;
        for node in self.layers.iter().flat_map(|l| &l.nodes) {
            commands.extend(render_node(node, &self.config, dpr));
        }

        commands
    }

    fn draw_links(&mut self, commands: &mut Vec<RenderCommand>) {
        let config = &self.config;
        let dpr = self.surface.dpr;
        let falloff = Falloff::new(
            1.0,
            self.surface.width_f() * config.link.falloff,
            config.link.floor,
        );
        let density = config.connection_density;

        commands.push(RenderCommand::Save);
        commands.push(RenderCommand::SetComposite {
            mode: CompositeMode::Lighter,
        });

        for pair in self.layers.windows(2) {
            for (i, a) in pair[0].nodes.iter().enumerate() {
                for (j, b) in pair[1].nodes.iter().enumerate() {
                    if density < 1.0 && self.rng.gen_range(0.0..1.0) >= density {
                        continue;
                    }
                    let mid = a.position.midpoint(&b.position);
                    let proximity = self
                        .pointer
                        .distance_to(&mid)
                        .map_or(config.link.idle, |d| falloff.score(d));

                    commands.push(render_link(&RenderLinkParams {
                        from: a,
                        to: b,
                        proximity,
                        indices: (i, j),
                        clock: self.elapsed,
                        dpr,
                        config,
                    }));
                }
            }
        }

        commands.push(RenderCommand::Restore);
    }

    fn update_nodes(&mut self, dt: f64) {
        let dpr = self.surface.dpr;
        for node in self.layers.iter_mut().flat_map(|l| l.nodes.iter_mut()) {
            advance_node(node, dt, &self.config, &self.pointer, dpr, &mut self.rng);
        }
    }

    fn burst_falloff(&self) -> Falloff {
        let burst = &self.config.burst;
        Falloff::new(burst.peak, burst.radius * self.surface.dpr, 0.0)
    }

    /// Current layers, left to right
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Current pointer state
    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Total number of nodes across all layers
    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Layer::len).sum()
    }

    /// Milliseconds of animation time since creation
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Mean activation over all nodes, 0 for an empty network
    pub fn mean_activation(&self) -> f64 {
        let count = self.node_count();
        if count == 0 {
            return 0.0;
        }
        let total: f64 = self
            .layers
            .iter()
            .flat_map(|l| &l.nodes)
            .map(|n| n.activation)
            .sum();
        total / count as f64
    }
}

/// Advance one node by `dt`: idle policy, hover boost, damping, clamp
fn advance_node<R: Rng + ?Sized>(
    node: &mut Node,
    dt: f64,
    config: &RendererConfig,
    pointer: &Pointer,
    dpr: f64,
    rng: &mut R,
) {
    node.clock += dt;
    let noise = rng.gen_range(0.0..1.0) - 0.5;

    let mut v = match config.idle {
        IdlePolicy::Pulse { amplitude, jitter } => {
            node.baseline
                + (node.clock * config.pulse_speed + node.phase).sin() * amplitude
                + noise * jitter
        }
        IdlePolicy::RandomWalk { jitter, .. } => node.activation + noise * jitter,
    };

    if let Some(d) = pointer.distance_to(&node.position) {
        let boost = &config.node_boost;
        v += boost.gain * Falloff::new(boost.peak, boost.radius * dpr, 0.0).score(d);
    }

    if let IdlePolicy::RandomWalk { damping, .. } = config.idle {
        v *= damping;
    }

    node.activation = config.activation.clamp(v);
}
