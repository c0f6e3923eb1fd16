//! Command implementations for pulsenet.
//!
//! Each command returns a result type implementing [`CommandResult`] so the
//! binary can print it as JSON (default) or human-readable text.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::{
    ConfigOverrides, Preset, RendererConfig, ValueSource, load_config_file, resolve_config,
    system_config_path,
};
use crate::scene::{FrameClock, PulseRenderer, RenderBackend, RenderCommand, Surface, background};
use crate::site::{BackdropPreset, FormStatus, NetBackdropOptions};
use crate::svg::SvgCanvas;
use crate::{Error, Result};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_or_error<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

// === Render ===

/// Output format of `render`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    Svg,
    Json,
}

impl FrameFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "svg" => Some(FrameFormat::Svg),
            "json" => Some(FrameFormat::Json),
            _ => None,
        }
    }
}

/// Parameters for `render`
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub frames: u32,
    pub frame_ms: f64,
    /// CSS width of the simulated canvas
    pub css_width: f64,
    pub dpr: f64,
    pub seed: u64,
    pub pointer: Option<(f64, f64)>,
    pub click: Option<(f64, f64)>,
    pub format: FrameFormat,
    pub background: Option<BackdropPreset>,
    pub out: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            frames: 1,
            frame_ms: 16.0,
            css_width: 1200.0,
            dpr: 1.0,
            seed: 0,
            pointer: None,
            click: None,
            format: FrameFormat::Svg,
            background: None,
            out: None,
        }
    }
}

/// JSON frame document
#[derive(Serialize)]
struct FrameDocument<'a> {
    surface: &'a Surface,
    elapsed_ms: f64,
    commands: &'a [RenderCommand],
}

/// Result of `render`
#[derive(Debug, Serialize)]
pub struct RenderResult {
    pub format: FrameFormat,
    pub width: u32,
    pub height: u32,
    pub dpr: f64,
    pub frames: u32,
    pub nodes: usize,
    pub commands: usize,
    pub mean_activation: f64,
    /// File the frame was written to, `None` when it is in `document`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,
    /// Rendered frame
    #[serde(skip)]
    pub document: String,
}

impl CommandResult for RenderResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Rendered {} frame(s) at {}x{} (dpr {})",
            self.frames, self.width, self.height, self.dpr
        )];
        lines.push(format!(
            "  {} nodes, {} commands, mean activation {:.3}",
            self.nodes, self.commands, self.mean_activation
        ));
        if let Some(ref out) = self.out {
            lines.push(format!("  Wrote {} to {}", format_name(self.format), out.display()));
        }
        lines.join("\n")
    }
}

fn format_name(format: FrameFormat) -> &'static str {
    match format {
        FrameFormat::Svg => "SVG",
        FrameFormat::Json => "JSON",
    }
}

/// Simulate `frames` ticks and render the last one.
///
/// The click, when given, lands before the first tick; the pointer is held
/// for every tick.
pub fn render(config: RendererConfig, options: &RenderOptions) -> Result<RenderResult> {
    let surface = Surface::from_css_width(options.css_width, options.dpr, &config.sizing);
    let mut renderer = PulseRenderer::from_seed(config, surface, options.seed);

    if let Some((x, y)) = options.pointer {
        renderer.pointer_move(x, y);
    }
    if let Some((x, y)) = options.click {
        renderer.excite(x, y);
    }

    let mut frame = Vec::new();
    for _ in 0..options.frames.max(1) {
        frame = renderer.tick(options.frame_ms);
    }

    let document = match options.format {
        FrameFormat::Svg => {
            let mut canvas = SvgCanvas::new(surface.width_f(), surface.height_f());
            if let Some(preset) = options.background {
                canvas = canvas.with_background(page_background(preset));
            }
            canvas.execute_all(&frame);
            canvas.finish()
        }
        FrameFormat::Json => serde_json::to_string_pretty(&FrameDocument {
            surface: renderer.surface(),
            elapsed_ms: renderer.elapsed(),
            commands: &frame,
        })?,
    };

    if let Some(ref out) = options.out {
        fs::write(out, &document)?;
        tracing::info!(path = %out.display(), bytes = document.len(), "Wrote frame");
    }

    Ok(RenderResult {
        format: options.format,
        width: surface.width,
        height: surface.height,
        dpr: surface.dpr,
        frames: options.frames.max(1),
        nodes: renderer.node_count(),
        commands: frame.len(),
        mean_activation: renderer.mean_activation(),
        out: options.out.clone(),
        document,
    })
}

fn page_background(preset: BackdropPreset) -> &'static str {
    match preset {
        BackdropPreset::Hero => background::HERO,
        BackdropPreset::Landing => background::LANDING,
    }
}

// === Run ===

/// Parameters for `run`
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub max_frames: Option<u64>,
    pub frame_ms: f64,
    pub css_width: f64,
    pub dpr: f64,
    pub seed: Option<u64>,
    pub stats_every: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            frame_ms: 16.0,
            css_width: 1200.0,
            dpr: 1.0,
            seed: None,
            stats_every: 60,
        }
    }
}

/// Result of `run`
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub frames: u64,
    pub elapsed_ms: f64,
    pub nodes: usize,
    pub mean_activation: f64,
    pub avg_commands: f64,
    pub interrupted: bool,
}

impl CommandResult for RunResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Ran {} frames over {:.0} ms{}\n  {} nodes, {:.1} commands/frame, mean activation {:.3}",
            self.frames,
            self.elapsed_ms,
            if self.interrupted { " (interrupted)" } else { "" },
            self.nodes,
            self.avg_commands,
            self.mean_activation
        )
    }
}

/// Drive the renderer in real time until `stop` is set or `max_frames` is reached.
pub fn run(config: RendererConfig, options: &RunOptions, stop: &AtomicBool) -> Result<RunResult> {
    let surface = Surface::from_css_width(options.css_width, options.dpr, &config.sizing);
    let max_delta = config.max_frame_delta;
    let mut renderer = match options.seed {
        Some(seed) => PulseRenderer::from_seed(config, surface, seed),
        None => PulseRenderer::from_entropy(config, surface),
    };

    let started = Instant::now();
    let mut clock = FrameClock::new(0.0, max_delta);
    let budget = Duration::from_secs_f64(options.frame_ms.max(0.0) / 1000.0);
    let mut frames = 0u64;
    let mut total_commands = 0usize;

    tracing::info!(
        width = surface.width,
        height = surface.height,
        nodes = renderer.node_count(),
        "Starting render loop"
    );

    while !stop.load(Ordering::SeqCst) {
        if options.max_frames.is_some_and(|max| frames >= max) {
            break;
        }
        let frame_start = Instant::now();
        let dt = clock.advance(started.elapsed().as_secs_f64() * 1000.0);
        total_commands += renderer.tick(dt).len();
        frames += 1;

        if options.stats_every > 0 && frames % options.stats_every == 0 {
            tracing::info!(
                frames,
                elapsed_ms = renderer.elapsed(),
                mean_activation = renderer.mean_activation(),
                "Render loop stats"
            );
        }

        if let Some(rest) = budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let interrupted = stop.load(Ordering::SeqCst);
    if interrupted {
        tracing::info!(frames, "Render loop interrupted");
    }

    Ok(RunResult {
        frames,
        elapsed_ms: renderer.elapsed(),
        nodes: renderer.node_count(),
        mean_activation: renderer.mean_activation(),
        avg_commands: if frames == 0 {
            0.0
        } else {
            total_commands as f64 / frames as f64
        },
        interrupted,
    })
}

// === Config ===

/// Build resolution overrides from the global flags.
pub fn overrides(config_path: Option<PathBuf>, preset: Option<&str>) -> Result<ConfigOverrides> {
    let mut overrides = ConfigOverrides::new();
    if let Some(path) = config_path {
        overrides = overrides.with_config_path(path);
    }
    if let Some(name) = preset {
        let preset = Preset::parse(name)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown preset '{}'", name)))?;
        overrides = overrides.with_preset(preset);
    }
    Ok(overrides)
}

/// Resolve the configuration for a command.
pub fn load_config(overrides: &ConfigOverrides) -> Result<RendererConfig> {
    let resolved = resolve_config(overrides)?;
    tracing::debug!(source = %resolved.source, "Resolved renderer config");
    Ok(resolved.value)
}

/// Result of `config show`
#[derive(Debug, Serialize)]
pub struct ConfigShowResult {
    pub source: String,
    pub preset: Preset,
    pub config: RendererConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kdl: Option<String>,
}

impl CommandResult for ConfigShowResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        if let Some(ref kdl) = self.kdl {
            return format!("// source: {}\n{}", self.source, kdl.trim_end());
        }
        let c = &self.config;
        let mut lines = vec![
            format!("Config source: {}", self.source),
            format!("Preset: {}", self.preset),
            format!(
                "Layers: {} ({})",
                c.layers,
                c.nodes_per_layer
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
            format!("Node radius: {}", c.node_radius),
            format!("Link alpha: {}", c.link_alpha),
            format!("Base hue: {}", c.base_hue),
            format!("Connection density: {}", c.connection_density),
            format!("Pulse speed: {}", c.pulse_speed),
            format!("Idle policy: {}", c.idle.name()),
            format!(
                "Activation range: {} - {}",
                c.activation.min, c.activation.max
            ),
        ];
        lines.push(format!("Node shape: {}", c.node_shape.as_str()));
        lines.push(format!("Halo: {}", if c.halo { "on" } else { "off" }));
        lines.push(format!("Max frame delta: {} ms", c.max_frame_delta));
        lines.join("\n")
    }
}

/// Show the resolved configuration.
pub fn config_show(overrides: &ConfigOverrides, as_kdl: bool) -> Result<ConfigShowResult> {
    let resolved = resolve_config(overrides)?;
    let config = resolved.value;
    Ok(ConfigShowResult {
        source: resolved.source.to_string(),
        preset: config.base_preset(),
        kdl: as_kdl.then(|| config.to_kdl_string()),
        config,
    })
}

/// Result of `config validate`
#[derive(Debug, Serialize)]
pub struct ConfigValidateResult {
    pub valid: bool,
    pub source: String,
}

impl CommandResult for ConfigValidateResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        format!("Config OK ({})", self.source)
    }
}

/// Validate a config file, or the resolved configuration when no path is given.
///
/// An invalid file is an error, so the process exits non-zero.
pub fn config_validate(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ConfigValidateResult> {
    let source = match path {
        Some(path) => {
            load_config_file(path, overrides.preset)?;
            ValueSource::CliFlag(path.to_path_buf())
        }
        None => resolve_config(overrides)?.source,
    };
    Ok(ConfigValidateResult {
        valid: true,
        source: source.to_string(),
    })
}

/// Result of `config path`
#[derive(Debug, Serialize)]
pub struct ConfigPathResult {
    pub path: Option<PathBuf>,
    pub exists: bool,
}

impl CommandResult for ConfigPathResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        match self.path {
            Some(ref path) if self.exists => path.display().to_string(),
            Some(ref path) => format!("{} (not created)", path.display()),
            None => "No config directory available".to_string(),
        }
    }
}

/// Report where the system config lives.
pub fn config_path() -> ConfigPathResult {
    let path = system_config_path();
    let exists = path.as_ref().is_some_and(|p| p.is_file());
    ConfigPathResult { path, exists }
}

// === Backdrop ===

/// Result of `backdrop`
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct BackdropResult {
    pub options: NetBackdropOptions,
}

impl CommandResult for BackdropResult {
    fn to_json(&self) -> String {
        json_or_error(&self.options)
    }

    fn to_human(&self) -> String {
        let o = &self.options;
        format!(
            "Element: {}\nLines: {} on {}\nPoints: {}  Max distance: {}  Spacing: {}\nMouse: {}  Touch: {}  Gyro: {}",
            o.el,
            o.color_hex(),
            o.background_hex(),
            o.points,
            o.max_distance,
            o.spacing,
            on_off(o.mouse_controls),
            on_off(o.touch_controls),
            on_off(o.gyro_controls)
        )
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

/// Options for the named backdrop.
pub fn backdrop(name: &str) -> Result<BackdropResult> {
    let preset = BackdropPreset::parse(name)
        .ok_or_else(|| Error::Other(format!("unknown backdrop '{}'", name)))?;
    Ok(BackdropResult {
        options: preset.options(),
    })
}

// === Contact ===

/// Result of `contact`
#[derive(Debug, Serialize)]
pub struct ContactResult {
    pub status: FormStatus,
    pub message: String,
    pub class: String,
}

impl CommandResult for ContactResult {
    fn to_json(&self) -> String {
        json_or_error(self)
    }

    fn to_human(&self) -> String {
        self.message.clone()
    }
}

/// Submit the contact form.
///
/// A rejected or failed submission is still a result; the caller decides the
/// exit code from [`FormStatus::is_success`].
pub fn contact(endpoint: &str, fields: &[(String, String)]) -> Result<ContactResult> {
    let status = crate::site::submit(endpoint, fields)?;
    Ok(ContactResult {
        message: status.message().to_string(),
        class: status.css_class(),
        status,
    })
}
