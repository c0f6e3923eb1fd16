//! Configuration for the pulse renderer.
//!
//! ## config.kdl
//!
//! Located at:
//! - System: `~/.config/pulsenet/config.kdl`
//! - Explicit: `--config <path>` or `PULSENET_CONFIG`
//!
//! Contains a `preset` ("neon" or "classic") plus any of the renderer keys
//! documented on [`RendererConfig`]. In the browser the same options are
//! passed as camelCase JSON to the mount call.
//!
//! Use the [`resolver`] module for precedence resolution.

#[cfg(not(target_arch = "wasm32"))]
pub mod resolver;
pub mod schema;

#[cfg(not(target_arch = "wasm32"))]
pub use resolver::{
    CONFIG_DIR_ENV, CONFIG_ENV, ConfigOverrides, Resolved, ValueSource, load_config_file,
    resolve_config, system_config_path,
};
pub use schema::{
    ActivationRange, Boost, IdlePolicy, LinkStyle, MAX_LAYERS, MAX_NODES_PER_LAYER, NodeShape,
    Preset, RendererConfig, SurfaceSizing,
};
