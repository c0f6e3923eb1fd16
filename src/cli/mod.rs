//! CLI argument definitions for pulsenet.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Version string with build details, shown by `--version`
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("PULSENET_GIT_COMMIT"),
    ", built ",
    env!("PULSENET_BUILD_TIMESTAMP"),
    ")"
);

/// pulsenet - Layered neural-network backdrop renderer.
///
/// Renders the animated backdrop headlessly to SVG or JSON, and manages the
/// renderer configuration shared with the browser build.
#[derive(Parser, Debug)]
#[command(name = "pulsenet")]
#[command(author, version, long_version = LONG_VERSION, about = "Render the layered pulse backdrop from the terminal", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Use this config.kdl instead of the system one.
    /// Takes precedence over the PULSENET_CONFIG environment variable.
    #[arg(long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    /// Base preset, overriding the `preset` entry of the config file
    #[arg(long, global = true, value_parser = ["neon", "classic"])]
    pub preset: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render frames and write the last one
    ///
    /// Runs the animation for --frames ticks of --frame-ms each, then writes
    /// the final frame as an SVG document or as JSON render commands.
    Render {
        /// Number of frames to simulate
        #[arg(long, default_value_t = 1)]
        frames: u32,

        /// Milliseconds between frames
        #[arg(long = "frame-ms", default_value_t = 16.0)]
        frame_ms: f64,

        /// On-screen (CSS) width of the canvas
        #[arg(long, default_value_t = 1200.0)]
        width: f64,

        /// Device pixel ratio (capped by the config)
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,

        /// Random seed for layout and jitter
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Hold the pointer at X,Y (surface pixels) for every frame
        #[arg(long, value_parser = parse_point)]
        pointer: Option<(f64, f64)>,

        /// Click at X,Y (surface pixels) before the first frame
        #[arg(long, value_parser = parse_point)]
        click: Option<(f64, f64)>,

        /// Output format
        #[arg(long, default_value = "svg", value_parser = ["svg", "json"])]
        format: String,

        /// Paint the page background colour under the frame
        #[arg(long, value_parser = ["hero", "landing"])]
        background: Option<String>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Run the animation loop headlessly until interrupted
    Run {
        /// Stop after this many frames
        #[arg(long = "max-frames")]
        max_frames: Option<u64>,

        /// Target milliseconds between frames
        #[arg(long = "frame-ms", default_value_t = 16.0)]
        frame_ms: f64,

        /// On-screen (CSS) width of the canvas
        #[arg(long, default_value_t = 1200.0)]
        width: f64,

        /// Device pixel ratio (capped by the config)
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,

        /// Random seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Log statistics every N frames
        #[arg(long = "stats-every", default_value_t = 60)]
        stats_every: u64,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print the options for the particle-network background
    Backdrop {
        /// Which page's options to print
        #[arg(id = "backdrop_preset", value_name = "PRESET", default_value = "hero", value_parser = ["hero", "landing"])]
        preset: String,
    },

    /// Submit the contact form to its endpoint
    Contact {
        /// Form endpoint URL
        #[arg(long)]
        endpoint: String,

        /// Form field as key=value (repeatable)
        #[arg(long = "field", short = 'f', value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where it came from
    Show {
        /// Print the configuration as KDL
        #[arg(long)]
        kdl: bool,
    },

    /// Validate a config file (the resolved one when omitted)
    Validate {
        /// Path to a config.kdl
        path: Option<PathBuf>,
    },

    /// Print the system config file path
    Path,
}

/// Parse "X,Y" into a point
pub fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid X coordinate '{}'", x))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid Y coordinate '{}'", y))?;
    Ok((x, y))
}

/// Parse "key=value" into a form field
pub fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty field name in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
