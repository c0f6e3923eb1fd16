//! Abstract rendering commands for the pulse renderer
//!
//! This module provides platform-agnostic drawing primitives that can be
//! executed on different backends (canvas 2D in the browser, SVG on the
//! command line).
//!
//! # Frame structure
//!
//! A frame is a flat list of commands:
//! - `Clear` the whole surface
//! - `Save`, additive composite, one `StrokeQuadratic` per drawn link, `Restore`
//! - per node: optional halo gradient, body gradient, bright core

use serde::{Deserialize, Serialize};

use super::layout::{Node, Position};
use super::theme::{self, Hsla};
use crate::config::{NodeShape, RendererConfig};

/// A render command that can be executed on any rendering backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    /// Clear the whole surface to transparent
    Clear { width: f64, height: f64 },
    /// Save the current compositing state
    Save,
    /// Restore the previous compositing state
    Restore,
    /// Set how new shapes combine with existing pixels
    SetComposite { mode: CompositeMode },
    /// Stroke a quadratic curve from `(x1, y1)` to `(x2, y2)` through control `(cx, cy)`
    StrokeQuadratic {
        x1: f64,
        y1: f64,
        cx: f64,
        cy: f64,
        x2: f64,
        y2: f64,
        color: String,
        line_width: f64,
    },
    /// Fill a circle with a radial gradient centred on it
    FillRadialGradient {
        cx: f64,
        cy: f64,
        radius: f64,
        stops: Vec<GradientStop>,
    },
    /// Fill a circle with a flat colour, optionally casting a glow
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: String,
        shadow: Option<Shadow>,
    },
}

/// Compositing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeMode {
    #[default]
    SourceOver,
    /// Additive blending
    Lighter,
}

impl CompositeMode {
    /// Canvas `globalCompositeOperation` value
    pub fn as_canvas(&self) -> &'static str {
        match self {
            CompositeMode::SourceOver => "source-over",
            CompositeMode::Lighter => "lighter",
        }
    }
}

/// A colour stop of a radial gradient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Offset from the centre (0) to the rim (1)
    pub offset: f64,
    pub color: String,
}

impl GradientStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self {
            offset,
            color: color.into(),
        }
    }
}

/// Blurred glow drawn under a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub blur: f64,
    pub color: String,
}

/// Something that can draw render commands
pub trait RenderBackend {
    /// Execute a single command
    fn execute(&mut self, command: &RenderCommand);

    /// Execute a full frame in order
    fn execute_all(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            self.execute(command);
        }
    }
}

/// Parameters for rendering a link
#[derive(Debug, Clone)]
pub struct RenderLinkParams<'a> {
    /// Node in the left layer
    pub from: &'a Node,
    /// Node in the right layer
    pub to: &'a Node,
    /// Pointer proximity of the link midpoint
    pub proximity: f64,
    /// Index of `from` within its layer and `to` within its layer
    pub indices: (usize, usize),
    /// Renderer clock in milliseconds
    pub clock: f64,
    /// Device pixel ratio
    pub dpr: f64,
    pub config: &'a RendererConfig,
}

/// Vertical offset of a link's control point
///
/// A continuous wave driven by both endpoint clocks.
pub fn link_wave_offset(from: &Node, to: &Node, config: &RendererConfig, dpr: f64) -> f64 {
    ((from.clock + to.clock) * config.pulse_speed).sin() * config.link.wave_amplitude * dpr
}

/// Generate the render command for a link
pub fn render_link(params: &RenderLinkParams) -> RenderCommand {
    let config = params.config;
    let style = &config.link;
    let a = params.from;
    let b = params.to;
    let proximity = params.proximity;
    let mid = a.position.midpoint(&b.position);

    // Mean activation of the endpoints
    let strength = (a.activation + b.activation) * 0.5;
    let (alpha, width) = if style.activation_weighted {
        (
            config.link_alpha * proximity * (0.5 + strength),
            (1.0 + strength) * params.dpr,
        )
    } else {
        (config.link_alpha * proximity, style.width * params.dpr)
    };

    let (i, j) = params.indices;
    let shimmer = (params.clock * 0.001 + i as f64 + j as f64).sin() * style.shimmer;
    let hue = config.base_hue + style.hue_shift * proximity + shimmer;
    let color = Hsla::neon(hue, 50.0 + 25.0 * proximity, alpha);

    RenderCommand::StrokeQuadratic {
        x1: a.position.x,
        y1: a.position.y,
        cx: mid.x,
        cy: mid.y + link_wave_offset(a, b, config, params.dpr),
        x2: b.position.x,
        y2: b.position.y,
        color: color.css(),
        line_width: width,
    }
}

/// Radius of the outer halo
pub fn halo_radius(config: &RendererConfig, dpr: f64, glow: f64) -> f64 {
    config.node_radius * dpr * (1.5 + glow * 1.2)
}

/// Radius of the main node body
pub fn body_radius(config: &RendererConfig, dpr: f64, glow: f64) -> f64 {
    let scale = match config.node_shape {
        NodeShape::Layered => 0.8 + glow * 0.4,
        NodeShape::Simple => 0.9 + glow * 0.6,
    };
    config.node_radius * dpr * scale
}

/// Radius of the bright core
pub fn core_radius(config: &RendererConfig, dpr: f64, glow: f64) -> f64 {
    match config.node_shape {
        NodeShape::Layered => 2.5 * dpr * (0.8 + glow * 0.3),
        NodeShape::Simple => 2.2 * dpr,
    }
}

fn body_stops(shape: NodeShape, hue: f64, glow: f64) -> Vec<GradientStop> {
    match shape {
        NodeShape::Layered => vec![
            GradientStop::new(0.0, Hsla::neon(hue + glow * 80.0, 80.0 + glow * 10.0, 0.9).css()),
            GradientStop::new(0.8, Hsla::neon(hue + glow * 60.0, 60.0 + glow * 20.0, 0.7).css()),
            GradientStop::new(1.0, theme::TRANSPARENT),
        ],
        NodeShape::Simple => vec![
            GradientStop::new(0.0, Hsla::neon(hue + glow * 80.0, 60.0 + glow * 20.0, 0.85).css()),
            GradientStop::new(1.0, theme::TRANSPARENT),
        ],
    }
}

fn core_color(shape: NodeShape, hue: f64, glow: f64) -> Hsla {
    match shape {
        NodeShape::Layered => Hsla::opaque(hue + glow * 40.0, 70.0 + glow * 15.0),
        NodeShape::Simple => Hsla::opaque(hue + glow * 60.0, 50.0 + glow * 10.0),
    }
}

/// Generate render commands for a node
///
/// Opacity and hue shift grow with activation, and so does every radius
/// except the fixed core of the simple shape.
pub fn render_node(node: &Node, config: &RendererConfig, dpr: f64) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(3);
    let glow = node.activation.max(0.0);
    let hue = config.base_hue;
    let shape = config.node_shape;
    let Position { x, y } = node.position;

    if config.halo {
        commands.push(RenderCommand::FillRadialGradient {
            cx: x,
            cy: y,
            radius: halo_radius(config, dpr, glow),
            stops: vec![
                GradientStop::new(0.0, Hsla::neon(hue + glow * 60.0, 70.0 + glow * 20.0, 0.6 * glow).css()),
                GradientStop::new(0.7, Hsla::neon(hue + glow * 40.0, 60.0 + glow * 15.0, 0.2 * glow).css()),
                GradientStop::new(1.0, theme::TRANSPARENT),
            ],
        });
    }

    commands.push(RenderCommand::FillRadialGradient {
        cx: x,
        cy: y,
        radius: body_radius(config, dpr, glow),
        stops: body_stops(shape, hue, glow),
    });

    let shadow = config.core_glow.then(|| Shadow {
        blur: 15.0 * glow * dpr,
        color: Hsla::opaque(hue, 70.0).css(),
    });
    commands.push(RenderCommand::FillCircle {
        cx: x,
        cy: y,
        radius: core_radius(config, dpr, glow),
        color: core_color(shape, hue, glow).css(),
        shadow,
    });

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f64, y: f64, activation: f64) -> Node {
        Node {
            position: Position::new(x, y),
            activation,
            clock: 0.0,
            baseline: 0.3,
            phase: 0.0,
        }
    }

    fn link_params<'a>(
        from: &'a Node,
        to: &'a Node,
        proximity: f64,
        config: &'a RendererConfig,
    ) -> RenderLinkParams<'a> {
        RenderLinkParams {
            from,
            to,
            proximity,
            indices: (0, 0),
            clock: 0.0,
            dpr: 1.0,
            config,
        }
    }

    #[test]
    fn test_render_node_neon_has_halo_body_core() {
        let config = RendererConfig::neon();
        let commands = render_node(&node_at(10.0, 10.0, 0.5), &config, 1.0);
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], RenderCommand::FillRadialGradient { .. }));
        assert!(matches!(
            commands[2],
            RenderCommand::FillCircle {
                shadow: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_render_node_classic_no_halo_no_glow() {
        let config = RendererConfig::classic();
        let commands = render_node(&node_at(10.0, 10.0, 0.5), &config, 1.0);
        assert_eq!(commands.len(), 2);
        assert!(matches!(
            commands[1],
            RenderCommand::FillCircle { shadow: None, .. }
        ));
    }

    #[test]
    fn test_node_radii_grow_with_activation() {
        let config = RendererConfig::neon();
        assert!(halo_radius(&config, 1.0, 1.0) > halo_radius(&config, 1.0, 0.2));
        assert!(body_radius(&config, 1.0, 1.0) > body_radius(&config, 1.0, 0.2));
        assert!(core_radius(&config, 1.0, 1.0) > core_radius(&config, 1.0, 0.2));
    }

    #[test]
    fn test_simple_shape_single_body_stop_fixed_core() {
        let config = RendererConfig::classic();
        let commands = render_node(&node_at(10.0, 20.0, 1.0), &config, 2.0);
        match &commands[0] {
            RenderCommand::FillRadialGradient { radius, stops, .. } => {
                // 5 * 2 * (0.9 + 0.6)
                assert!((radius - 15.0).abs() < 1e-9);
                assert_eq!(stops.len(), 2);
                assert_eq!(stops[0].color, "hsla(275.0, 100%, 80.0%, 0.850)");
                assert_eq!(stops[1].color, theme::TRANSPARENT);
            }
            other => panic!("Expected FillRadialGradient, got {:?}", other),
        }
        match &commands[1] {
            RenderCommand::FillCircle { radius, color, .. } => {
                assert!((radius - 4.4).abs() < 1e-9);
                assert_eq!(color, "hsl(255.0, 100%, 60.0%)");
            }
            other => panic!("Expected FillCircle, got {:?}", other),
        }

        let dim = render_node(&node_at(10.0, 20.0, 0.2), &config, 2.0);
        assert!(matches!(dim[1], RenderCommand::FillCircle { radius, .. } if (radius - 4.4).abs() < 1e-9));
    }

    #[test]
    fn test_layered_shape_three_body_stops() {
        let config = RendererConfig {
            halo: false,
            ..RendererConfig::neon()
        };
        match &render_node(&node_at(0.0, 0.0, 0.5), &config, 1.0)[0] {
            RenderCommand::FillRadialGradient { stops, .. } => assert_eq!(stops.len(), 3),
            other => panic!("Expected FillRadialGradient, got {:?}", other),
        }
    }

    #[test]
    fn test_node_radii_scale_with_dpr() {
        let config = RendererConfig::neon();
        assert!((body_radius(&config, 2.0, 0.5) - 2.0 * body_radius(&config, 1.0, 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_render_link_endpoints() {
        let config = RendererConfig::neon();
        let a = node_at(0.0, 0.0, 0.5);
        let b = node_at(100.0, 50.0, 0.5);
        match render_link(&link_params(&a, &b, 0.6, &config)) {
            RenderCommand::StrokeQuadratic {
                x1, y1, cx, x2, y2, ..
            } => {
                assert_eq!((x1, y1), (0.0, 0.0));
                assert_eq!((x2, y2), (100.0, 50.0));
                assert_eq!(cx, 50.0);
            }
            other => panic!("Expected StrokeQuadratic, got {:?}", other),
        }
    }

    #[test]
    fn test_render_link_width_weighted_by_activation() {
        let config = RendererConfig::neon();
        let a = node_at(0.0, 0.0, 1.0);
        let b = node_at(100.0, 0.0, 1.0);
        match render_link(&link_params(&a, &b, 1.0, &config)) {
            RenderCommand::StrokeQuadratic { line_width, .. } => {
                assert!((line_width - 2.0).abs() < 1e-9)
            }
            other => panic!("Expected StrokeQuadratic, got {:?}", other),
        }
    }

    #[test]
    fn test_render_link_fixed_width_classic() {
        let config = RendererConfig::classic();
        let a = node_at(0.0, 0.0, 1.0);
        let b = node_at(100.0, 0.0, 1.0);
        match render_link(&RenderLinkParams {
            dpr: 2.0,
            ..link_params(&a, &b, 1.0, &config)
        }) {
            RenderCommand::StrokeQuadratic { line_width, .. } => {
                assert!((line_width - 2.4).abs() < 1e-9)
            }
            other => panic!("Expected StrokeQuadratic, got {:?}", other),
        }
    }

    #[test]
    fn test_link_wave_offset_bounded() {
        let config = RendererConfig::neon();
        let mut a = node_at(0.0, 0.0, 0.5);
        let b = node_at(10.0, 0.0, 0.5);
        for t in 0..200 {
            a.clock = t as f64 * 37.0;
            let offset = link_wave_offset(&a, &b, &config, 2.0);
            assert!(offset.abs() <= 24.0 + 1e-9);
        }
    }

    #[test]
    fn test_composite_mode_canvas_names() {
        assert_eq!(CompositeMode::Lighter.as_canvas(), "lighter");
        assert_eq!(CompositeMode::SourceOver.as_canvas(), "source-over");
    }

    #[test]
    fn test_render_command_json_tag() {
        let json = serde_json::to_string(&RenderCommand::Save).unwrap();
        assert_eq!(json, r#"{"op":"save"}"#);
        let json = serde_json::to_string(&RenderCommand::SetComposite {
            mode: CompositeMode::Lighter,
        })
        .unwrap();
        assert_eq!(json, r#"{"op":"set_composite","mode":"lighter"}"#);
    }
}
