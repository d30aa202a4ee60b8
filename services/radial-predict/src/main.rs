//! Hydroacoustic travel-time predictor.
//!
//! Opens a radial model library directory and prints predictions or a
//! library summary as JSON on stdout. Logs go to stderr.

mod commands;
mod config;

use std::io::{self, Write};

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use radial_library::{HydroPredictor, PredictionRequest, RadialModelLibrary};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{model_config, Args, Command};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let config = model_config(args.policy.as_deref())?;
    info!(library = %args.library.display(), policy = %config.policy, "Starting radial-predict");

    let library = RadialModelLibrary::open(&args.library, &config)?;

    match args.command {
        Command::Predict {
            station,
            time,
            lat,
            lon,
            phase,
        } => {
            let request = PredictionRequest {
                station,
                time: time.unwrap_or_else(Utc::now),
                source_lat: lat,
                source_lon: lon,
                phase,
            };
            let prediction = HydroPredictor::new(library.clone()).predict(&request)?;
            print_json(&prediction)?;
        }
        Command::Batch { input, threads } => {
            if let Some(threads) = threads {
                rayon::ThreadPoolBuilder::new().num_threads(threads).build_global()?;
            }
            let lines = commands::batch_file(&HydroPredictor::new(library.clone()), &input)?;
            let mut out = io::stdout().lock();
            for line in &lines {
                serde_json::to_writer(&mut out, line)?;
                writeln!(out)?;
            }
        }
        Command::Describe { season } => {
            let summary = commands::describe(&library, season.as_deref())?;
            print_json(&summary)?;
        }
    }

    info!(
        models_loaded = library.stats().models_loaded,
        load_failures = library.stats().load_failures,
        "Done"
    );
    library.close();
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
