//! Drawing surface geometry
//!
//! The surface is the pixel grid a renderer draws into. Its size follows the
//! on-screen element width scaled by the (capped) device pixel ratio.

use serde::{Deserialize, Serialize};

use crate::config::SurfaceSizing;

use super::layout::Position;

/// Pixel dimensions of a drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
    /// Device pixel ratio used to derive the size
    pub dpr: f64,
}

impl Surface {
    /// Create a surface with explicit pixel dimensions
    pub fn new(width: u32, height: u32, dpr: f64) -> Self {
        Self {
            width,
            height,
            dpr: if dpr > 0.0 { dpr } else { 1.0 },
        }
    }

    /// Derive the surface from an element's CSS width and the raw device pixel ratio
    ///
    /// Width is floored to whole pixels and raised to the configured minimum;
    /// height follows the CSS width through the aspect ratio.
    pub fn from_css_width(css_width: f64, raw_dpr: f64, sizing: &SurfaceSizing) -> Self {
        let dpr = effective_dpr(raw_dpr, sizing.max_dpr);
        let css_width = if css_width.is_finite() {
            css_width.max(0.0)
        } else {
            0.0
        };
        let width = ((css_width * dpr).floor() as u32).max(sizing.min_width);
        let height = (css_width * sizing.aspect_ratio * dpr).floor() as u32;
        Self { width, height, dpr }
    }

    /// Width as a float
    pub fn width_f(&self) -> f64 {
        self.width as f64
    }

    /// Height as a float
    pub fn height_f(&self) -> f64 {
        self.height as f64
    }

    /// Convert a client (CSS) coordinate into surface pixels
    pub fn client_to_surface(
        &self,
        client_x: f64,
        client_y: f64,
        rect_left: f64,
        rect_top: f64,
    ) -> Position {
        Position::new(
            (client_x - rect_left) * self.dpr,
            (client_y - rect_top) * self.dpr,
        )
    }

    /// Whether the surface has no drawable area
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Cap the device pixel ratio; missing or invalid ratios count as 1
pub fn effective_dpr(raw: f64, max: f64) -> f64 {
    let dpr = if raw.is_finite() && raw > 0.0 { raw } else { 1.0 };
    dpr.min(max.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_dpr() {
        assert_eq!(effective_dpr(1.5, 2.0), 1.5);
        assert_eq!(effective_dpr(3.0, 2.0), 2.0);
        assert_eq!(effective_dpr(0.0, 2.0), 1.0);
        assert_eq!(effective_dpr(f64::NAN, 2.0), 1.0);
    }

    #[test]
    fn test_from_css_width() {
        let surface = Surface::from_css_width(800.0, 2.0, &SurfaceSizing::default());
        assert_eq!(surface.width, 1600);
        assert_eq!(surface.height, 880);
        assert_eq!(surface.dpr, 2.0);
    }

    #[test]
    fn test_from_css_width_min_width() {
        let surface = Surface::from_css_width(100.0, 1.0, &SurfaceSizing::default());
        assert_eq!(surface.width, 320);
        // Height follows the CSS width, not the clamped pixel width
        assert_eq!(surface.height, 55);
    }

    #[test]
    fn test_from_css_width_no_minimum() {
        let sizing = SurfaceSizing {
            min_width: 0,
            ..Default::default()
        };
        let surface = Surface::from_css_width(0.0, 1.0, &sizing);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_client_to_surface() {
        let surface = Surface::new(1600, 880, 2.0);
        let pos = surface.client_to_surface(110.0, 70.0, 10.0, 20.0);
        assert_eq!(pos, Position::new(200.0, 100.0));
    }

    #[test]
    fn test_new_rejects_bad_dpr() {
        assert_eq!(Surface::new(10, 10, -1.0).dpr, 1.0);
    }
}
