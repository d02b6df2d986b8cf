//! Configuration system for the terrain generator.
//!
//! Mirrors the generator's configuration surface (terrain size, noise
//! parameters, decoration toggles) plus export and debug settings. Settings
//! persist to disk as RON, accept CLI overrides via clap, and tolerate
//! missing or unknown fields.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DecorationConfig, ExportConfig, TerrainConfig};
pub use error::ConfigError;
