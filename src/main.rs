//! pulsenet CLI - Render the layered pulse backdrop from the terminal.

use std::io::{self, Write};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use pulsenet::cli::{Cli, Commands, ConfigCommands};
use pulsenet::commands::{self, CommandResult, FrameFormat, RenderOptions, RunOptions};
use pulsenet::config::ConfigOverrides;
use pulsenet::site::BackdropPreset;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    init_logging();

    let result = commands::overrides(cli.config_path, cli.preset.as_deref())
        .and_then(|overrides| run_command(cli.command, &overrides, human));

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            if human {
                eprintln!("Error: {}", e);
            } else {
                eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            }
            process::exit(1);
        }
    }
}

/// Log to stderr, filtered by RUST_LOG (warnings only by default).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Run a command and return the process exit code.
fn run_command(
    command: Commands,
    overrides: &ConfigOverrides,
    human: bool,
) -> Result<i32, pulsenet::Error> {
    match command {
        Commands::Render {
            frames,
            frame_ms,
            width,
            dpr,
            seed,
            pointer,
            click,
            format,
            background,
            out,
        } => {
            let config = commands::load_config(overrides)?;
            let options = RenderOptions {
                frames,
                frame_ms,
                css_width: width,
                dpr,
                seed,
                pointer,
                click,
                format: FrameFormat::parse(&format).unwrap_or(FrameFormat::Svg),
                background: background.as_deref().and_then(BackdropPreset::parse),
                out,
            };
            let result = commands::render(config, &options)?;
            if result.out.is_some() {
                output(&result, human);
            } else {
                let mut stdout = io::stdout().lock();
                stdout.write_all(result.document.as_bytes())?;
                stdout.flush()?;
            }
        }
        Commands::Run {
            max_frames,
            frame_ms,
            width,
            dpr,
            seed,
            stats_every,
        } => {
            let config = commands::load_config(overrides)?;
            let stop = Arc::new(AtomicBool::new(false));
            {
                let stop = stop.clone();
                ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))
                    .map_err(|e| pulsenet::Error::Other(format!("Failed to set Ctrl-C handler: {}", e)))?;
            }
            let options = RunOptions {
                max_frames,
                frame_ms,
                css_width: width,
                dpr,
                seed,
                stats_every,
            };
            let result = commands::run(config, &options, &stop)?;
            output(&result, human);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show { kdl } => {
                let result = commands::config_show(overrides, kdl)?;
                output(&result, human);
            }
            ConfigCommands::Validate { path } => {
                let result = commands::config_validate(path.as_deref(), overrides)?;
                output(&result, human);
            }
            ConfigCommands::Path => {
                output(&commands::config_path(), human);
            }
        },
        Commands::Backdrop { preset } => {
            let result = commands::backdrop(&preset)?;
            output(&result, human);
        }
        Commands::Contact { endpoint, fields } => {
            let result = commands::contact(&endpoint, &fields)?;
            output(&result, human);
            if !result.status.is_success() {
                return Ok(1);
            }
        }
    }
    Ok(0)
}

fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
