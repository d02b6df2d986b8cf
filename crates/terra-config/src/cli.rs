//! Command-line argument parsing for the terrain generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "terra", about = "Procedural heightmap generator")]
pub struct CliArgs {
    /// Terrain width.
    #[arg(long, allow_negative_numbers = true)]
    pub width: Option<i32>,

    /// Terrain height (depth).
    #[arg(long, allow_negative_numbers = true)]
    pub height: Option<i32>,

    /// Noise scale.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Horizontal noise offset.
    #[arg(long, allow_negative_numbers = true)]
    pub offset_x: Option<f64>,

    /// Vertical noise offset.
    #[arg(long, allow_negative_numbers = true)]
    pub offset_y: Option<f64>,

    /// Number of noise octaves.
    #[arg(long)]
    pub octaves: Option<u32>,

    /// Amplitude decay per octave.
    #[arg(long)]
    pub persistence: Option<f64>,

    /// Frequency growth per octave.
    #[arg(long)]
    pub lacunarity: Option<f64>,

    /// Height multiplier.
    #[arg(long)]
    pub height_multiplier: Option<f32>,

    /// Perlin permutation seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Add the grass detail layer.
    #[arg(long)]
    pub grass: bool,

    /// Scatter trees.
    #[arg(long)]
    pub trees: bool,

    /// Configured tree count.
    #[arg(long)]
    pub tree_count: Option<u32>,

    /// Seed for tree placement.
    #[arg(long)]
    pub placement_seed: Option<u64>,

    /// Root directory for `Exports/`.
    #[arg(long)]
    pub export_root: Option<PathBuf>,

    /// Out-of-range policy for PNG encoding (clamp, rescale, reject).
    #[arg(long)]
    pub range_policy: Option<String>,

    /// Generate only; do not write a PNG.
    #[arg(long)]
    pub no_export: bool,

    /// Show the exported file in the platform file manager.
    #[arg(long)]
    pub reveal: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let terrain = &mut self.terrain;
        if let Some(w) = args.width {
            terrain.width = w;
        }
        if let Some(h) = args.height {
            terrain.height = h;
        }
        if let Some(scale) = args.scale {
            terrain.scale = scale;
        }
        if let Some(x) = args.offset_x {
            terrain.offset_x = x;
        }
        if let Some(y) = args.offset_y {
            terrain.offset_y = y;
        }
        if let Some(octaves) = args.octaves {
            terrain.octaves = octaves;
        }
        if let Some(p) = args.persistence {
            terrain.persistence = p;
        }
        if let Some(l) = args.lacunarity {
            terrain.lacunarity = l;
        }
        if let Some(m) = args.height_multiplier {
            terrain.height_multiplier = m;
        }
        if let Some(seed) = args.seed {
            terrain.seed = seed;
        }

        let decoration = &mut self.decoration;
        if args.grass {
            decoration.add_grass = true;
        }
        if args.trees {
            decoration.add_trees = true;
        }
        if let Some(count) = args.tree_count {
            decoration.tree_count = count;
        }
        if let Some(seed) = args.placement_seed {
            decoration.placement_seed = Some(seed);
        }

        if let Some(ref root) = args.export_root {
            self.export.root = Some(root.clone());
        }
        if let Some(ref policy) = args.range_policy {
            self.export.range_policy = policy.clone();
        }
        if args.reveal {
            self.export.reveal_after_export = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
