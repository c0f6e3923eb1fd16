//! pulsenet - An animated layered neural-network backdrop.
//!
//! This library provides the renderer behind the site's canvas backdrop and
//! the `pulsenet` CLI, including layout, the per-frame animation loop, render
//! command generation, and the small site collaborators around it.

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;
pub mod config;
pub mod scene;
pub mod site;
pub mod svg;
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod wasm;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("KDL parse error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
