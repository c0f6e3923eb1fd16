//! Theme constants and colour helpers for the pulse renderer
//!
//! Colours are emitted as CSS strings so the same render commands can be
//! executed by a canvas 2D context or written into an SVG document.

use std::fmt;

/// Default hue for links and nodes (cyan, degrees)
pub const BASE_HUE: f64 = 195.0;

/// Fully transparent terminal stop for radial gradients
pub const TRANSPARENT: &str = "rgba(0,0,0,0)";

/// Page background colours the backdrop is designed against
pub mod background {
    /// Hero section background
    pub const HERO: &str = "#060912";
    /// Landing page background
    pub const LANDING: &str = "#0a0a0a";
}

/// An HSLA colour with saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl Hsla {
    /// Create a fully saturated colour (the renderer never desaturates)
    pub fn neon(hue: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            hue,
            saturation: 100.0,
            lightness,
            alpha,
        }
    }

    /// Create an opaque fully saturated colour
    pub fn opaque(hue: f64, lightness: f64) -> Self {
        Self::neon(hue, lightness, 1.0)
    }

    /// CSS representation; opaque colours use the shorter `hsl()` form
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hue = normalize_hue(self.hue);
        if self.alpha >= 1.0 {
            write!(
                f,
                "hsl({:.1}, {:.0}%, {:.1}%)",
                hue, self.saturation, self.lightness
            )
        } else {
            write!(
                f,
                "hsla({:.1}, {:.0}%, {:.1}%, {:.3})",
                hue,
                self.saturation,
                self.lightness,
                self.alpha.max(0.0)
            )
        }
    }
}

/// Wrap a hue into `[0, 360)`
pub fn normalize_hue(hue: f64) -> f64 {
    let wrapped = hue.rem_euclid(360.0);
    if wrapped.is_finite() { wrapped } else { 0.0 }
}

/// Format a packed `0xRRGGBB` colour as a CSS hex string
pub fn hex_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0x00ff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsla_css_translucent() {
        let color = Hsla::neon(195.0, 50.0, 0.25);
        assert_eq!(color.css(), "hsla(195.0, 100%, 50.0%, 0.250)");
    }

    #[test]
    fn test_hsla_css_opaque_uses_hsl() {
        let color = Hsla::opaque(235.0, 85.0);
        assert_eq!(color.css(), "hsl(235.0, 100%, 85.0%)");
    }

    #[test]
    fn test_hsla_negative_alpha_is_floored() {
        let color = Hsla::neon(10.0, 50.0, -0.5);
        assert!(color.css().ends_with("0.000)"));
    }

    #[test]
    fn test_normalize_hue() {
        assert_eq!(normalize_hue(375.0), 15.0);
        assert_eq!(normalize_hue(-15.0), 345.0);
        assert_eq!(normalize_hue(f64::NAN), 0.0);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color(0x00d4ff), "#00d4ff");
        assert_eq!(hex_color(0x060912), "#060912");
    }
}
