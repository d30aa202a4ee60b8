//! Command-line arguments and the model configuration they select.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use radial_model::{ModelConfig, Phase};

#[derive(Parser, Debug)]
#[command(name = "radial-predict")]
#[command(about = "Hydroacoustic travel-time predictions from a radial model library")]
pub struct Args {
    /// Library directory (station list, time guide, season directories)
    #[arg(short, long, env = "RADIAL2D_LIBRARY")]
    pub library: PathBuf,

    /// Interpolation policy: legacy or improved
    #[arg(long, env = "RADIAL2D_MODEL_POLICY")]
    pub policy: Option<String>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Predict one source-receiver pair
    Predict {
        #[arg(short, long)]
        station: String,

        /// Origin time (RFC 3339); defaults to now
        #[arg(short, long)]
        time: Option<DateTime<Utc>>,

        /// Source latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Source longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// T or H
        #[arg(short, long, default_value = "H")]
        phase: Phase,
    },

    /// Predict every request of a JSON-lines file, one prediction per line
    Batch {
        /// Input file; each line is a JSON prediction request
        #[arg(short, long)]
        input: PathBuf,

        /// Worker threads (default: one per core)
        #[arg(long)]
        threads: Option<usize>,
    },

    /// Summarize the library and its models
    Describe {
        /// Only this season
        #[arg(long)]
        season: Option<String>,
    },
}

/// Model configuration from the environment, with the policy flag applied.
pub fn model_config(policy: Option<&str>) -> Result<ModelConfig> {
    let mut config = ModelConfig::from_env()?;
    if let Some(policy) = policy {
        config.policy = policy.parse()?;
    }
    config.validate().map_err(|e| anyhow!("invalid model configuration: {}", e))?;
    Ok(config)
}
