//! Brick Runtime
//!
//! Opens the window and plays the breakout scene. The exit status reports
//! how the session ended: success for a victory or a quit, failure for a
//! defeat or an error.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use brick_core::{Game, RunSummary};
use brick_render::WinitBackend;
use brick_runtime::{build_scene, EscapeQuits};
use brick_services::Settings;
use tracing_subscriber::EnvFilter;

const SETTINGS_ENV: &str = "BRICK_SETTINGS";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Brick Engine v{}", brick_core::VERSION);

    match run() {
        Ok(summary) => exit_code(&summary),
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<RunSummary> {
    let settings = load_settings()?;

    let backend = WinitBackend::new(&settings.window).context("failed to open the game window")?;
    let mut game = Game::new(EscapeQuits::new(backend), settings.game_config());
    game.set_scene(Some(build_scene(&settings)));

    let summary = game.run().context("game loop failed")?;
    tracing::info!(frames = summary.frames, outcome = ?summary.outcome, "session over");
    Ok(summary)
}

/// First CLI argument, then `BRICK_SETTINGS`, then built-in defaults.
fn load_settings() -> Result<Settings> {
    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(SETTINGS_ENV))
        .map(PathBuf::from);

    match path {
        Some(path) => Settings::load(&path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => {
            tracing::info!("using default settings");
            Ok(Settings::default())
        }
    }
}

fn exit_code(summary: &RunSummary) -> ExitCode {
    match summary.outcome {
        Some(outcome) if !outcome.is_victory() => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
