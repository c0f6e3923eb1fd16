//! WASM front-end for the pulse backdrop
//!
//! This module mounts [`PulseRenderer`](crate::scene::PulseRenderer)s on
//! canvas elements and drives them from the browser's display-refresh loop.
//! All drawing decisions live in `scene`; this layer only measures elements,
//! forwards pointer events and executes render commands on a 2D context.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Browser                                  │
//! │   canvas.neural-canvas   .section   VANTA │
//! │   #contact-form                           │
//! └───────┬───────────────────┬─────────┬────┘
//!         │ pointer / resize  │ scroll  │ submit
//! ┌───────▼───────────────────▼─────────▼────┐
//! │  bindings: mountAll  mountReveal          │
//! │            initBackdrop                   │
//! │  contact:  mountContact                   │
//! └───────┬───────────────────┬─────────┬────┘
//!         │ RenderCommand     │         │ fetch
//! ┌───────▼────────┐   ┌──────▼───────┐ ┌▼─────────────┐
//! │ scene + canvas │   │ site::reveal │ │ site::contact │
//! └────────────────┘   └──────────────┘ └──────────────┘
//! ```
//!
//! # Usage
//!
//! Built with `wasm-pack build --target web -- --features wasm`:
//!
//! ```javascript
//! import init, { mountAll, mountReveal, initBackdrop, mountContact } from './pulsenet.js';
//!
//! await init();
//! mountAll(JSON.stringify({ baseHue: 200 }));
//! mountReveal();
//! initBackdrop('hero');
//! mountContact();
//! ```

mod bindings;
mod canvas;
mod contact;

pub use bindings::*;
pub use canvas::CanvasBackend;
pub use contact::mount_contact;

use wasm_bindgen::prelude::*;

/// Initialize WASM panic hook for better error messages in browser console
///
/// Safe to call more than once.
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Version information for the WASM module
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate version, for display in the page footer
#[wasm_bindgen]
pub fn version() -> String {
    VERSION.to_string()
}
