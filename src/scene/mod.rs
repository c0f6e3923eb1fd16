//! Platform-agnostic pulse renderer
//!
//! This module contains the rendering logic shared by the browser front-end
//! and the command-line renderer. Nothing here touches a real canvas; frames
//! are produced as lists of [`RenderCommand`]s for a [`RenderBackend`].
//!
//! # Modules
//!
//! - `theme`: Colour constants and HSLA formatting
//! - `surface`: Pixel surface sizing from element width and device pixel ratio
//! - `layout`: Layer and node placement
//! - `falloff`: Distance-based proximity scores and pointer state
//! - `render`: Abstract rendering commands for links and nodes
//! - `pulse`: The per-surface renderer and frame clock

pub mod falloff;
pub mod layout;
pub mod pulse;
pub mod render;
pub mod surface;
pub mod theme;

pub use falloff::*;
pub use layout::*;
pub use pulse::*;
pub use render::*;
pub use surface::*;
pub use theme::*;
