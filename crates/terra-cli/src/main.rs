//! `terra`: generate a procedural heightmap and export it as a grayscale PNG.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p terra-cli -- --width 512 --height 256 --trees` to
//! override the footprint and scatter trees.

mod platform;
mod request;

use std::process::ExitCode;

use clap::Parser;
use terra_config::{CliArgs, Config};
use terra_export::{ExportError, reveal_in_file_manager};
use terra_terrain::TerrainError;
use tracing::info;

use crate::platform::{PlatformDirs, PlatformError};

/// Failures that end a `terra` run.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error("invalid terrain configuration: {0}")]
    Terrain(#[from] TerrainError),
    #[error("{0}")]
    RangePolicy(String),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve() {
        Ok(dirs) => dirs.with_config_dir(args.config.as_deref()),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    terra_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config, &dirs, args.no_export) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, dirs: &PlatformDirs, no_export: bool) -> Result<(), AppError> {
    let request = request::generation_request(config);
    // Checked before any sampling.
    let policy = request::range_policy(config).map_err(AppError::RangePolicy)?;

    let mut rng = terra_terrain::placement_rng(config.decoration.placement_seed);
    let generation = terra_terrain::generate(&request, &mut rng)?;

    let (min, max) = generation.heightmap.min_max();
    info!(
        resolution = generation.heightmap.resolution(),
        min,
        max,
        "heightmap ready"
    );
    for decoration in &generation.decorations {
        info!(decoration = %request::describe_decoration(decoration), "decoration ready");
    }

    if no_export {
        info!("export skipped");
        return Ok(());
    }

    dirs.create_dirs()?;
    let layout = request::export_layout(config, dirs);
    let path = layout.export_heightmap(&generation.heightmap, policy)?;
    println!("{}", path.display());

    if config.export.reveal_after_export {
        reveal_in_file_manager(&path);
    }
    Ok(())
}
