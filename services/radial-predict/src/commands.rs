//! Subcommand implementations; each returns a serializable report.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use radial_library::{HydroPredictor, LibraryStats, Prediction, PredictionRequest, RadialModelLibrary};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

/// One line of batch output: a prediction or the reason there is none.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchLine {
    Prediction(Prediction),
    Error { line: usize, error: String },
}

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub station: String,
    pub file: String,
    pub period: String,
    pub lat: f64,
    pub lon: f64,
    pub spokes: usize,
    pub delta: f64,
    pub dazimuth: f64,
    pub shortest_spoke: usize,
    pub longest_spoke: usize,
}

#[derive(Debug, Serialize)]
pub struct SeasonSummary {
    pub name: String,
    pub models: Vec<ModelSummary>,
}

#[derive(Debug, Serialize)]
pub struct LibrarySummary {
    pub root: String,
    pub policy: String,
    pub ht_convert: f64,
    pub stations: Vec<String>,
    pub seasons: Vec<SeasonSummary>,
    pub stats: LibraryStats,
}

/// Parse `text` as JSON-lines requests and predict them in parallel, preserving order.
pub fn batch(predictor: &HydroPredictor, text: &str) -> Vec<BatchLine> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let results: Vec<BatchLine> = lines
        .par_iter()
        .map(|&(line, json)| {
            let outcome = serde_json::from_str::<PredictionRequest>(json)
                .map_err(anyhow::Error::from)
                .and_then(|request| predictor.predict(&request).map_err(anyhow::Error::from));
            match outcome {
                Ok(prediction) => BatchLine::Prediction(prediction),
                Err(e) => {
                    warn!(line, error = %e, "Skipping batch request");
                    BatchLine::Error {
                        line,
                        error: e.to_string(),
                    }
                }
            }
        })
        .collect();

    info!(requests = results.len(), "Batch complete");
    results
}

pub fn batch_file(predictor: &HydroPredictor, input: &Path) -> Result<Vec<BatchLine>> {
    let text = fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    Ok(batch(predictor, &text))
}

pub fn describe(library: &RadialModelLibrary, season: Option<&str>) -> Result<LibrarySummary> {
    let seasons = match season {
        Some(season) => vec![season.to_string()],
        None => library.seasons()?,
    };

    let mut summaries = Vec::with_capacity(seasons.len());
    for name in seasons {
        let models = library
            .models(&name)?
            .into_iter()
            .map(|(station, model)| {
                let lengths = model.native_lengths();
                ModelSummary {
                    station,
                    file: model.name(),
                    period: model.period().to_string(),
                    lat: model.lat(),
                    lon: model.lon(),
                    spokes: model.spoke_count(),
                    delta: model.delta(),
                    dazimuth: model.dazimuth(),
                    shortest_spoke: lengths.iter().copied().min().unwrap_or(0),
                    longest_spoke: lengths.iter().copied().max().unwrap_or(0),
                }
            })
            .collect();
        summaries.push(SeasonSummary { name, models });
    }

    Ok(LibrarySummary {
        root: library.root().display().to_string(),
        policy: library.policy().to_string(),
        ht_convert: library.ht_convert()?,
        stations: library.station_names()?,
        seasons: summaries,
        stats: library.stats(),
    })
}
