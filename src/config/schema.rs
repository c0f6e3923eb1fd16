//! KDL schema definitions for the renderer configuration.
//!
//! This module provides:
//! - Rust structs representing the renderer options
//! - Serialization/deserialization to/from KDL format
//! - JSON (serde) representation for the browser mount API
//! - Validation functions
//! - The two built-in presets

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

use crate::scene::theme::BASE_HUE;

/// Largest accepted layer count
pub const MAX_LAYERS: usize = 64;

/// Largest accepted node count for a single layer
pub const MAX_NODES_PER_LAYER: usize = 256;

/// Built-in look presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Halo layers, sampled links, phase-offset pulsing (default)
    #[default]
    Neon,
    /// Dense links, single body gradient, damped random walk
    Classic,
}

impl Preset {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "neon" => Some(Preset::Neon),
            "classic" => Some(Preset::Classic),
            _ => None,
        }
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Neon => "neon",
            Preset::Classic => "classic",
        }
    }

    /// Full configuration for this preset.
    pub fn config(&self) -> RendererConfig {
        match self {
            Preset::Neon => RendererConfig::neon(),
            Preset::Classic => RendererConfig::classic(),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a node's activation evolves while nothing excites it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum IdlePolicy {
    /// Sinusoid around the node's baseline, offset by its phase, plus jitter
    Pulse { amplitude: f64, jitter: f64 },
    /// Random-walk jitter with multiplicative damping
    RandomWalk { jitter: f64, damping: f64 },
}

impl IdlePolicy {
    /// KDL/CLI name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            IdlePolicy::Pulse { .. } => "pulse",
            IdlePolicy::RandomWalk { .. } => "random-walk",
        }
    }

    /// Jitter amplitude of either policy.
    pub fn jitter(&self) -> f64 {
        match self {
            IdlePolicy::Pulse { jitter, .. } | IdlePolicy::RandomWalk { jitter, .. } => *jitter,
        }
    }
}

impl Default for IdlePolicy {
    fn default() -> Self {
        IdlePolicy::Pulse {
            amplitude: 0.3,
            jitter: 0.1,
        }
    }
}

/// How a node is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    /// Two-stop body gradient and a core that grows with activation
    #[default]
    Layered,
    /// One translucent body stop and a fixed-size core
    Simple,
}

impl NodeShape {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "layered" => Some(NodeShape::Layered),
            "simple" => Some(NodeShape::Simple),
            _ => None,
        }
    }

    /// KDL name of the shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Layered => "layered",
            NodeShape::Simple => "simple",
        }
    }
}

/// Inclusive bounds for node activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivationRange {
    pub min: f64,
    pub max: f64,
}

impl ActivationRange {
    /// Clamp a value into the range. NaN collapses to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    /// Whether a value lies within the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ActivationRange {
    fn default() -> Self {
        Self { min: 0.1, max: 1.5 }
    }
}

/// A linear-decay activation boost: `gain * max(0, peak - d / (radius * dpr))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    /// Value at zero distance
    pub peak: f64,
    /// Falloff length in CSS pixels
    pub radius: f64,
    /// Multiplier applied to the decayed value
    pub gain: f64,
}

/// Link drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinkStyle {
    /// Pointer falloff radius as a fraction of the surface width
    pub falloff: f64,
    /// Lowest proximity score while the pointer is active
    pub floor: f64,
    /// Proximity used while the pointer is inactive
    pub idle: f64,
    /// Hue added at full proximity
    pub hue_shift: f64,
    /// Amplitude of the time-driven hue shimmer
    pub shimmer: f64,
    /// Stroke width in CSS pixels when not activation-weighted
    pub width: f64,
    /// Scale alpha and width by the endpoints' activation
    pub activation_weighted: bool,
    /// Vertical amplitude of the breathing curve in CSS pixels
    pub wave_amplitude: f64,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            falloff: 0.4,
            floor: 0.3,
            idle: 0.6,
            hue_shift: 0.0,
            shimmer: 20.0,
            width: 1.0,
            activation_weighted: true,
            wave_amplitude: 12.0,
        }
    }
}

/// Rules for deriving the pixel surface from the on-screen element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurfaceSizing {
    /// Minimum pixel width
    pub min_width: u32,
    /// Height as a fraction of the CSS width
    pub aspect_ratio: f64,
    /// Upper bound for the device pixel ratio
    pub max_dpr: f64,
}

impl Default for SurfaceSizing {
    fn default() -> Self {
        Self {
            min_width: 320,
            aspect_ratio: 0.55,
            max_dpr: 2.0,
        }
    }
}

/// Renderer options.
///
/// # KDL Schema
///
/// ```kdl
/// preset "neon"              // or "classic"; remaining keys override it
/// layers 7
/// nodes-per-layer 8 12 16 20 16 12 6
/// node-radius 6.0
/// link-alpha 0.15
/// base-hue 195
/// connection-density 0.7
/// pulse-speed 0.003
/// idle-policy "pulse"        // or "random-walk"
/// pulse-amplitude 0.3
/// idle-jitter 0.1
/// idle-damping 0.98
/// node-shape "layered"       // or "simple"
/// halo #true
/// activation-min 0.1
/// activation-max 1.5
/// max-frame-delta 64
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RendererConfig {
    /// Number of layers, left to right
    pub layers: usize,
    /// Node count per layer; the last entry repeats for extra layers
    pub nodes_per_layer: Vec<usize>,
    /// Node radius in CSS pixels
    pub node_radius: f64,
    /// Base link opacity
    pub link_alpha: f64,
    /// Base hue in degrees
    pub base_hue: f64,
    /// Probability that a given link is drawn on a frame
    pub connection_density: f64,
    /// Angular speed of node clocks (radians per millisecond)
    pub pulse_speed: f64,
    /// Idle activation policy
    pub idle: IdlePolicy,
    /// Body and core drawing
    pub node_shape: NodeShape,
    /// Draw the outer halo gradient
    pub halo: bool,
    /// Draw a shadow glow under the node core
    pub core_glow: bool,
    /// Activation bounds
    pub activation: ActivationRange,
    /// Link drawing parameters
    pub link: LinkStyle,
    /// Pointer hover boost applied to nodes every frame
    pub node_boost: Boost,
    /// One-shot click/tap boost
    pub burst: Boost,
    /// Ceiling for the elapsed time of a single frame, in milliseconds
    pub max_frame_delta: f64,
    /// Fraction of the height left empty above and below the node band
    pub vertical_inset: f64,
    /// Surface sizing rules
    pub sizing: SurfaceSizing,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::neon()
    }
}

impl RendererConfig {
    /// Richer look: halos, sampled links, phase-offset pulsing.
    pub fn neon() -> Self {
        Self {
            layers: 7,
            nodes_per_layer: vec![8, 12, 16, 20, 16, 12, 6],
            node_radius: 6.0,
            link_alpha: 0.15,
            base_hue: BASE_HUE,
            connection_density: 0.7,
            pulse_speed: 0.003,
            idle: IdlePolicy::Pulse {
                amplitude: 0.3,
                jitter: 0.1,
            },
            node_shape: NodeShape::Layered,
            halo: true,
            core_glow: true,
            activation: ActivationRange { min: 0.1, max: 1.5 },
            link: LinkStyle::default(),
            node_boost: Boost {
                peak: 1.5,
                radius: 180.0,
                gain: 0.4,
            },
            burst: Boost {
                peak: 1.6,
                radius: 120.0,
                gain: 1.0,
            },
            max_frame_delta: 64.0,
            vertical_inset: 0.09,
            sizing: SurfaceSizing::default(),
        }
    }

    /// Simpler look: every link drawn, damped random walk.
    pub fn classic() -> Self {
        Self {
            layers: 6,
            nodes_per_layer: vec![7, 10, 12, 10, 8, 5],
            node_radius: 5.0,
            link_alpha: 0.18,
            base_hue: BASE_HUE,
            connection_density: 1.0,
            pulse_speed: 0.002,
            idle: IdlePolicy::RandomWalk {
                jitter: 0.05,
                damping: 0.98,
            },
            node_shape: NodeShape::Simple,
            halo: false,
            core_glow: false,
            activation: ActivationRange { min: 0.2, max: 1.2 },
            link: LinkStyle {
                falloff: 0.5,
                floor: 0.25,
                idle: 0.5,
                hue_shift: 40.0,
                shimmer: 0.0,
                width: 1.2,
                activation_weighted: false,
                wave_amplitude: 8.0,
            },
            node_boost: Boost {
                peak: 1.0,
                radius: 220.0,
                gain: 0.02,
            },
            burst: Boost {
                peak: 1.6,
                radius: 120.0,
                gain: 1.0,
            },
            max_frame_delta: 64.0,
            vertical_inset: 0.09,
            sizing: SurfaceSizing {
                min_width: 0,
                ..SurfaceSizing::default()
            },
        }
    }

    /// Validate the config values.
    ///
    /// Returns an error message describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.layers == 0 {
            return Err("layers must be at least 1".to_string());
        }
        if self.layers > MAX_LAYERS {
            return Err(format!(
                "layers must be at most {}, got {}",
                MAX_LAYERS, self.layers
            ));
        }
        if self.nodes_per_layer.is_empty() {
            return Err("nodes-per-layer must list at least one count".to_string());
        }
        if let Some(count) = self
            .nodes_per_layer
            .iter()
            .find(|count| **count > MAX_NODES_PER_LAYER)
        {
            return Err(format!(
                "nodes-per-layer counts must be at most {}, got {}",
                MAX_NODES_PER_LAYER, count
            ));
        }
        if !(0.0..=1.0).contains(&self.connection_density) {
            return Err(format!(
                "connection-density must be within 0-1, got {}",
                self.connection_density
            ));
        }
        if self.activation.min > self.activation.max {
            return Err(format!(
                "activation-min ({}) must not exceed activation-max ({})",
                self.activation.min, self.activation.max
            ));
        }
        if self.node_radius <= 0.0 {
            return Err(format!("node-radius must be positive, got {}", self.node_radius));
        }
        if self.max_frame_delta <= 0.0 {
            return Err(format!(
                "max-frame-delta must be positive, got {}",
                self.max_frame_delta
            ));
        }
        if !(0.0..0.5).contains(&self.vertical_inset) {
            return Err(format!(
                "vertical inset must be within 0-0.5, got {}",
                self.vertical_inset
            ));
        }
        if let IdlePolicy::RandomWalk { damping, .. } = self.idle {
            if !(0.0..=1.0).contains(&damping) {
                return Err(format!("idle-damping must be within 0-1, got {}", damping));
            }
        }
        Ok(())
    }

    /// Parse and validate the camelCase JSON form used by the browser mount call.
    ///
    /// Missing keys take their neon values.
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate().map_err(crate::Error::InvalidConfig)?;
        Ok(config)
    }

    /// Parse config from a KDL document.
    ///
    /// Starts from the document's `preset` (neon when absent) and applies every
    /// recognised key on top. Values of the wrong type are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        Self::from_kdl_with_preset(doc, None)
    }

    /// Parse config from a KDL document, with `preset` taking precedence over
    /// the document's own `preset` entry when given.
    pub fn from_kdl_with_preset(doc: &KdlDocument, preset: Option<Preset>) -> Self {
        let preset = preset
            .or_else(|| {
                first_value(doc, "preset")
                    .and_then(|v| v.as_string())
                    .and_then(Preset::parse)
            })
            .unwrap_or_default();
        let mut config = preset.config();

        if let Some(layers) = first_value(doc, "layers").and_then(|v| v.as_integer()) {
            if layers >= 0 {
                config.layers = layers as usize;
            }
        }

        if let Some(node) = doc.get("nodes-per-layer") {
            let counts: Vec<usize> = node
                .entries()
                .iter()
                .filter(|e| e.name().is_none())
                .filter_map(|e| e.value().as_integer())
                .filter(|i| *i >= 0)
                .map(|i| i as usize)
                .collect();
            config.nodes_per_layer = counts;
        }

        if let Some(v) = first_number(doc, "node-radius") {
            config.node_radius = v;
        }
        if let Some(v) = first_number(doc, "link-alpha") {
            config.link_alpha = v;
        }
        if let Some(v) = first_number(doc, "base-hue") {
            config.base_hue = v;
        }
        if let Some(v) = first_number(doc, "connection-density") {
            config.connection_density = v;
        }
        if let Some(v) = first_number(doc, "pulse-speed") {
            config.pulse_speed = v;
        }

        // Idle policy: switching policy keeps the current jitter
        if let Some(name) = first_value(doc, "idle-policy").and_then(|v| v.as_string()) {
            let jitter = config.idle.jitter();
            match name {
                "pulse" if !matches!(config.idle, IdlePolicy::Pulse { .. }) => {
                    config.idle = IdlePolicy::Pulse {
                        amplitude: 0.3,
                        jitter,
                    };
                }
                "random-walk" if !matches!(config.idle, IdlePolicy::RandomWalk { .. }) => {
                    config.idle = IdlePolicy::RandomWalk {
                        jitter,
                        damping: 0.98,
                    };
                }
                _ => {}
            }
        }
        if let Some(v) = first_number(doc, "idle-jitter") {
            match &mut config.idle {
                IdlePolicy::Pulse { jitter, .. } | IdlePolicy::RandomWalk { jitter, .. } => {
                    *jitter = v
                }
            }
        }
        if let Some(v) = first_number(doc, "pulse-amplitude") {
            if let IdlePolicy::Pulse { amplitude, .. } = &mut config.idle {
                *amplitude = v;
            }
        }
        if let Some(v) = first_number(doc, "idle-damping") {
            if let IdlePolicy::RandomWalk { damping, .. } = &mut config.idle {
                *damping = v;
            }
        }

        if let Some(shape) = first_value(doc, "node-shape")
            .and_then(|v| v.as_string())
            .and_then(NodeShape::parse)
        {
            config.node_shape = shape;
        }
        if let Some(v) = first_value(doc, "halo").and_then(|v| v.as_bool()) {
            config.halo = v;
        }
        if let Some(v) = first_number(doc, "activation-min") {
            config.activation.min = v;
        }
        if let Some(v) = first_number(doc, "activation-max") {
            config.activation.max = v;
        }
        if let Some(v) = first_number(doc, "max-frame-delta") {
            config.max_frame_delta = v;
        }

        config
    }

    /// Convert config to a KDL document.
    ///
    /// Options outside the KDL schema are carried by the `preset` entry.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        push_value(
            &mut doc,
            "preset",
            KdlValue::String(self.base_preset().as_str().to_string()),
        );
        push_value(&mut doc, "layers", KdlValue::Integer(self.layers as i128));

        let mut counts = KdlNode::new("nodes-per-layer");
        for count in &self.nodes_per_layer {
            counts.push(KdlEntry::new(KdlValue::Integer(*count as i128)));
        }
        doc.nodes_mut().push(counts);

        push_value(&mut doc, "node-radius", KdlValue::Float(self.node_radius));
        push_value(&mut doc, "link-alpha", KdlValue::Float(self.link_alpha));
        push_value(&mut doc, "base-hue", KdlValue::Float(self.base_hue));
        push_value(
            &mut doc,
            "connection-density",
            KdlValue::Float(self.connection_density),
        );
        push_value(&mut doc, "pulse-speed", KdlValue::Float(self.pulse_speed));
        push_value(
            &mut doc,
            "idle-policy",
            KdlValue::String(self.idle.name().to_string()),
        );
        match self.idle {
            IdlePolicy::Pulse { amplitude, jitter } => {
                push_value(&mut doc, "pulse-amplitude", KdlValue::Float(amplitude));
                push_value(&mut doc, "idle-jitter", KdlValue::Float(jitter));
            }
            IdlePolicy::RandomWalk { jitter, damping } => {
                push_value(&mut doc, "idle-jitter", KdlValue::Float(jitter));
                push_value(&mut doc, "idle-damping", KdlValue::Float(damping));
            }
        }
        push_value(
            &mut doc,
            "node-shape",
            KdlValue::String(self.node_shape.as_str().to_string()),
        );
        push_value(&mut doc, "halo", KdlValue::Bool(self.halo));
        push_value(&mut doc, "activation-min", KdlValue::Float(self.activation.min));
        push_value(&mut doc, "activation-max", KdlValue::Float(self.activation.max));
        push_value(
            &mut doc,
            "max-frame-delta",
            KdlValue::Float(self.max_frame_delta),
        );

        doc
    }

    /// Render the config as KDL text.
    pub fn to_kdl_string(&self) -> String {
        let mut doc = self.to_kdl();
        doc.autoformat();
        doc.to_string()
    }

    /// The preset whose non-KDL options (link style, boosts, sizing) this config uses.
    pub fn base_preset(&self) -> Preset {
        let classic = Self::classic();
        if self.link == classic.link
            && self.sizing == classic.sizing
            && self.node_boost == classic.node_boost
            && self.core_glow == classic.core_glow
            && self.node_shape == classic.node_shape
        {
            Preset::Classic
        } else {
            Preset::Neon
        }
    }

    /// Node count for layer `index`, repeating the last configured count.
    pub fn nodes_in_layer(&self, index: usize) -> usize {
        self.nodes_per_layer
            .get(index)
            .or_else(|| self.nodes_per_layer.last())
            .copied()
            .unwrap_or(0)
    }
}

fn first_value<'a>(doc: &'a KdlDocument, key: &str) -> Option<&'a KdlValue> {
    doc.get(key)?.entries().first().map(|entry| entry.value())
}

fn first_number(doc: &KdlDocument, key: &str) -> Option<f64> {
    let value = first_value(doc, key)?;
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}

fn push_value(doc: &mut KdlDocument, key: &str, value: KdlValue) {
    let mut node = KdlNode::new(key);
    node.push(KdlEntry::new(value));
    doc.nodes_mut().push(node);
}
