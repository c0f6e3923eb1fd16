//! Particle-network background options
//!
//! The pages load a third-party "net" effect behind some sections. This module
//! owns the option blocks passed to it so both pages stay in one place.

use serde::{Deserialize, Serialize};

use crate::scene::theme::hex_color;

/// Named option blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackdropPreset {
    /// Hero section of the documentation site
    #[default]
    Hero,
    /// Full-page landing background
    Landing,
}

impl BackdropPreset {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hero" => Some(BackdropPreset::Hero),
            "landing" => Some(BackdropPreset::Landing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackdropPreset::Hero => "hero",
            BackdropPreset::Landing => "landing",
        }
    }

    /// Options for this preset
    pub fn options(&self) -> NetBackdropOptions {
        match self {
            BackdropPreset::Hero => NetBackdropOptions::hero(),
            BackdropPreset::Landing => NetBackdropOptions::landing(),
        }
    }
}

impl std::fmt::Display for BackdropPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Options object for the net background effect, serialised camelCase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetBackdropOptions {
    /// CSS selector of the host element
    pub el: String,
    pub mouse_controls: bool,
    pub touch_controls: bool,
    pub gyro_controls: bool,
    /// Line colour as packed `0xRRGGBB`
    pub color: u32,
    /// Background colour as packed `0xRRGGBB`
    pub background_color: u32,
    pub points: f64,
    pub max_distance: f64,
    pub spacing: f64,
}

impl NetBackdropOptions {
    /// Cyan lines over the hero section
    pub fn hero() -> Self {
        Self {
            el: "#hero-bg".to_string(),
            mouse_controls: true,
            touch_controls: true,
            gyro_controls: false,
            color: 0x00d4ff,
            background_color: 0x060912,
            points: 10.0,
            max_distance: 18.0,
            spacing: 15.0,
        }
    }

    /// Calmer, darker lines behind the landing page
    pub fn landing() -> Self {
        Self {
            el: "#vanta-bg".to_string(),
            mouse_controls: true,
            touch_controls: true,
            gyro_controls: false,
            color: 0x2a7bc9,
            background_color: 0x0a0a0a,
            points: 8.0,
            max_distance: 20.0,
            spacing: 20.0,
        }
    }

    /// Element id targeted by the selector, if it is an id selector
    pub fn element_id(&self) -> Option<&str> {
        self.el.strip_prefix('#')
    }

    /// Line colour as a CSS hex string
    pub fn color_hex(&self) -> String {
        hex_color(self.color)
    }

    /// Background colour as a CSS hex string
    pub fn background_hex(&self) -> String {
        hex_color(self.background_color)
    }

    /// JSON object as passed to the effect's constructor
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// The effect runs only when both the library and its host element exist
pub fn should_initialise(library_loaded: bool, element_present: bool) -> bool {
    library_loaded && element_present
}
