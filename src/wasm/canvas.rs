//! Canvas 2D backend for render commands

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::scene::{RenderBackend, RenderCommand};

/// Executes render commands on a canvas 2D context
#[derive(Debug, Clone)]
pub struct CanvasBackend {
    ctx: CanvasRenderingContext2d,
}

impl CanvasBackend {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn try_execute(&self, command: &RenderCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            RenderCommand::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),
            RenderCommand::Save => ctx.save(),
            RenderCommand::Restore => ctx.restore(),
            RenderCommand::SetComposite { mode } => {
                ctx.set_global_composite_operation(mode.as_canvas())?
            }
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
                ctx.set_stroke_style_str(color);
                ctx.set_line_width(*line_width);
                ctx.begin_path();
                ctx.move_to(*x1, *y1);
                ctx.quadratic_curve_to(*cx, *cy, *x2, *y2);
                ctx.stroke();
            }
            RenderCommand::FillRadialGradient {
                cx,
                cy,
                radius,
                stops,
            } => {
                let gradient = ctx.create_radial_gradient(*cx, *cy, 0.0, *cx, *cy, radius.max(0.0))?;
                for stop in stops {
                    gradient.add_color_stop(stop.offset.clamp(0.0, 1.0) as f32, &stop.color)?;
                }
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.arc(*cx, *cy, radius.max(0.0), 0.0, std::f64::consts::TAU)?;
                ctx.fill();
            }
            RenderCommand::FillCircle {
                cx,
                cy,
                radius,
                color,
                shadow,
            } => {
                if let Some(shadow) = shadow {
                    ctx.set_shadow_blur(shadow.blur);
                    ctx.set_shadow_color(&shadow.color);
                }
                ctx.set_fill_style_str(color);
                ctx.begin_path();
                ctx.arc(*cx, *cy, radius.max(0.0), 0.0, std::f64::consts::TAU)?;
                ctx.fill();
                if shadow.is_some() {
                    ctx.set_shadow_blur(0.0);
                }
            }
        }
        Ok(())
    }
}

impl RenderBackend for CanvasBackend {
    fn execute(&mut self, command: &RenderCommand) {
        if let Err(err) = self.try_execute(command) {
            web_sys::console::warn_2(&JsValue::from_str("pulsenet: draw failed"), &err);
        }
    }
}
