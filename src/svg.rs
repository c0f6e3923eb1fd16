//! SVG rendering backend
//!
//! Executes render commands into a standalone SVG document so frames can be
//! rendered without a browser. Radial gradients become user-space
//! `<radialGradient>` definitions, quadratic strokes become `<path>` elements,
//! additive compositing maps to `mix-blend-mode: plus-lighter`, and core glows
//! become a blurred circle under the core.

use std::fmt::Write as _;

use crate::scene::{CompositeMode, GradientStop, RenderBackend, RenderCommand, Shadow};

/// Collects render commands into an SVG document
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    background: Option<String>,
    defs: Vec<String>,
    body: Vec<String>,
    composite: CompositeMode,
    saved: Vec<CompositeMode>,
    next_id: usize,
}

impl SvgCanvas {
    /// Create an empty canvas of the given pixel size
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            defs: Vec::new(),
            body: Vec::new(),
            composite: CompositeMode::SourceOver,
            saved: Vec::new(),
            next_id: 0,
        }
    }

    /// Paint a solid background under every frame
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    /// Number of drawn elements since the last clear
    pub fn element_count(&self) -> usize {
        self.body.len()
    }

    /// Finish the document
    pub fn finish(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = num(self.width),
            h = num(self.height)
        );
        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            for def in &self.defs {
                out.push_str(def);
                out.push('\n');
            }
            out.push_str("</defs>\n");
        }
        if let Some(bg) = &self.background {
            let _ = writeln!(
                out,
                r#"<rect width="100%" height="100%" fill="{}"/>"#,
                escape(bg)
            );
        }
        for element in &self.body {
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    fn blend_attr(&self) -> &'static str {
        match self.composite {
            CompositeMode::SourceOver => "",
            CompositeMode::Lighter => r#" style="mix-blend-mode:plus-lighter""#,
        }
    }

    fn gradient(&mut self, cx: f64, cy: f64, radius: f64, stops: &[GradientStop]) {
        let id = self.next_id("g");
        let mut def = format!(
            r#"<radialGradient id="{}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">"#,
            id,
            num(cx),
            num(cy),
            num(radius)
        );
        for stop in stops {
            let _ = write!(
                def,
                r#"<stop offset="{}" stop-color="{}"/>"#,
                num(stop.offset),
                escape(&stop.color)
            );
        }
        def.push_str("</radialGradient>");
        self.defs.push(def);

        self.body.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="url(#{})"{}/>"#,
            num(cx),
            num(cy),
            num(radius),
            id,
            self.blend_attr()
        ));
    }

    fn shadow(&mut self, cx: f64, cy: f64, radius: f64, shadow: &Shadow) {
        if shadow.blur <= 0.0 {
            return;
        }
        let id = self.next_id("s");
        self.defs.push(format!(
            r#"<filter id="{}" x="-100%" y="-100%" width="300%" height="300%"><feGaussianBlur stdDeviation="{}"/></filter>"#,
            id,
            num(shadow.blur / 2.0)
        ));
        self.body.push(format!(
            r#"<circle cx="{}" cy="{}" r="{}" fill="{}" filter="url(#{})"{}/>"#,
            num(cx),
            num(cy),
            num(radius),
            escape(&shadow.color),
            id,
            self.blend_attr()
        ));
    }
}

impl RenderBackend for SvgCanvas {
    fn execute(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::Clear { width, height } => {
                self.width = *width;
                self.height = *height;
                self.defs.clear();
                self.body.clear();
                self.next_id = 0;
            }
            RenderCommand::Save => self.saved.push(self.composite),
            RenderCommand::Restore => {
                if let Some(mode) = self.saved.pop() {
                    self.composite = mode;
                }
            }
            RenderCommand::SetComposite { mode } => self.composite = *mode,
            RenderCommand::StrokeQuadratic {
                x1,
                y1,
                cx,
                cy,
                x2,
                y2,
                color,
                line_width,
            } => {
                self.body.push(format!(
                    r#"<path d="M {} {} Q {} {} {} {}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
                    num(*x1),
                    num(*y1),
                    num(*cx),
                    num(*cy),
                    num(*x2),
                    num(*y2),
                    escape(color),
                    num(*line_width),
                    self.blend_attr()
                ));
            }
            RenderCommand::FillRadialGradient {
                cx,
                cy,
                radius,
                stops,
            } => self.gradient(*cx, *cy, *radius, stops),
            RenderCommand::FillCircle {
                cx,
                cy,
                radius,
                color,
                shadow,
            } => {
                if let Some(shadow) = shadow {
                    self.shadow(*cx, *cy, *radius, shadow);
                }
                self.body.push(format!(
                    r#"<circle cx="{}" cy="{}" r="{}" fill="{}"{}/>"#,
                    num(*cx),
                    num(*cy),
                    num(*radius),
                    escape(color),
                    self.blend_attr()
                ));
            }
        }
    }
}

/// Format a coordinate with at most two decimals
fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" || text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererConfig;
    use crate::scene::{PulseRenderer, Surface};

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(1.23456), "1.23");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn test_empty_canvas() {
        let svg = SvgCanvas::new(100.0, 50.0).finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 100 50""#));
        assert!(!svg.contains("<defs>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_stroke_quadratic_path() {
        let mut canvas = SvgCanvas::new(100.0, 100.0);
        canvas.execute(&RenderCommand::StrokeQuadratic {
            x1: 0.0,
            y1: 0.0,
            cx: 50.0,
            cy: 60.0,
            x2: 100.0,
            y2: 0.0,
            color: "red".to_string(),
            line_width: 1.5,
        });
        let svg = canvas.finish();
        assert!(svg.contains(r#"d="M 0 0 Q 50 60 100 0""#));
        assert!(svg.contains(r#"stroke-width="1.5""#));
        assert!(!svg.contains("plus-lighter"));
    }

    #[test]
    fn test_composite_scoped_by_save_restore() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.execute_all(&[
            RenderCommand::Save,
            RenderCommand::SetComposite {
                mode: CompositeMode::Lighter,
            },
            RenderCommand::FillCircle {
                cx: 1.0,
                cy: 1.0,
                radius: 1.0,
                color: "blue".to_string(),
                shadow: None,
            },
            RenderCommand::Restore,
            RenderCommand::FillCircle {
                cx: 2.0,
                cy: 2.0,
                radius: 1.0,
                color: "blue".to_string(),
                shadow: None,
            },
        ]);
        let svg = canvas.finish();
        assert_eq!(svg.matches("plus-lighter").count(), 1);
    }

    #[test]
    fn test_gradient_definition() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.execute(&RenderCommand::FillRadialGradient {
            cx: 5.0,
            cy: 5.0,
            radius: 4.0,
            stops: vec![GradientStop::new(0.0, "white"), GradientStop::new(1.0, "black")],
        });
        let svg = canvas.finish();
        assert!(svg.contains(r#"<radialGradient id="g1" gradientUnits="userSpaceOnUse""#));
        assert_eq!(svg.matches("<stop ").count(), 2);
        assert!(svg.contains(r#"fill="url(#g1)""#));
    }

    #[test]
    fn test_shadow_adds_filter() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.execute(&RenderCommand::FillCircle {
            cx: 5.0,
            cy: 5.0,
            radius: 2.0,
            color: "white".to_string(),
            shadow: Some(Shadow {
                blur: 6.0,
                color: "cyan".to_string(),
            }),
        });
        assert_eq!(canvas.element_count(), 2);
        assert!(canvas.finish().contains(r#"<feGaussianBlur stdDeviation="3"/>"#));
    }

    #[test]
    fn test_clear_resets_document() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        canvas.execute(&RenderCommand::FillCircle {
            cx: 5.0,
            cy: 5.0,
            radius: 2.0,
            color: "white".to_string(),
            shadow: None,
        });
        canvas.execute(&RenderCommand::Clear {
            width: 20.0,
            height: 30.0,
        });
        assert_eq!(canvas.element_count(), 0);
        assert!(canvas.finish().contains(r#"width="20" height="30""#));
    }

    #[test]
    fn test_background_and_escape() {
        let svg = SvgCanvas::new(10.0, 10.0)
            .with_background("#060912\"")
            .finish();
        assert!(svg.contains(r##"fill="#060912&quot;""##));
    }

    #[test]
    fn test_renders_full_frame() {
        let mut renderer =
            PulseRenderer::from_seed(RendererConfig::neon(), Surface::new(640, 352, 1.0), 1);
        let frame = renderer.tick(16.0);
        let mut canvas = SvgCanvas::new(640.0, 352.0);
        canvas.execute_all(&frame);
        let svg = canvas.finish();
        assert!(svg.contains("<path "));
        assert!(svg.contains("<radialGradient"));
        assert!(svg.contains("mix-blend-mode:plus-lighter"));
    }
}
