//! Station-centered travel-time grid for one station and season.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use geodesy::{EarthShape, UnitVector};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{RadialModelError, Result};
use crate::kernel::GridKernel;
use crate::reader::parse_grid;
use crate::types::{Interpolation, InterpolationPolicy, Phase};

/// An azimuth/radius grid of travel time and uncertainty around one station.
///
/// Immutable once built except for [`set_ht_convert`](Self::set_ht_convert),
/// which the owning library calls before sharing the model. Two models are
/// equal when they were loaded from the same canonical file.
#[derive(Debug, Clone)]
pub struct RadialGridModel {
    source: PathBuf,
    center: UnitVector,
    period: String,
    ht_convert: f64,
    kernel: GridKernel,
}

impl RadialGridModel {
    /// Load a grid file.
    pub fn open(path: impl AsRef<Path>, config: &ModelConfig) -> Result<Self> {
        let path = path.as_ref();
        let load = || -> Result<Self> {
            let source = path.canonicalize()?;
            let data = std::fs::read(&source)?;
            Self::from_bytes(source, Bytes::from(data), config)
        };
        let model = load().map_err(|e| e.at(path.display().to_string()))?;

        info!(
            path = %model.source.display(),
            policy = %model.policy(),
            spokes = model.spoke_count(),
            period = %model.period,
            "Loaded radial grid"
        );
        Ok(model)
    }

    /// Build a model from an in-memory grid; `source` becomes its identity.
    pub fn from_bytes(source: impl Into<PathBuf>, data: Bytes, config: &ModelConfig) -> Result<Self> {
        config.validate().map_err(RadialModelError::Config)?;
        let raw = parse_grid(data, config.max_label_len)?;
        let center = EarthShape::Wgs84.vector_degrees(raw.latitude as f64, raw.longitude as f64);
        let period = raw.period.clone();
        let kernel = GridKernel::build(raw, config)?;

        Ok(Self {
            source: source.into(),
            center,
            period,
            ht_convert: 0.0,
            kernel,
        })
    }

    /// Interpolate at a distance and azimuth from the center, both in degrees.
    ///
    /// A blocked query is retried once along the antipodal path; the retry
    /// wins only if it is not blocked itself.
    pub fn interpolate(&self, distance_deg: f64, azimuth_deg: f64) -> Interpolation {
        let azimuth = azimuth_deg.rem_euclid(360.0);
        let primary = self.kernel.evaluate(distance_deg, azimuth);
        if !primary.blocked {
            return primary;
        }

        let retry = self
            .kernel
            .evaluate(360.0 - distance_deg, (azimuth + 180.0).rem_euclid(360.0));
        debug!(
            model = %self.name(),
            distance = distance_deg,
            azimuth,
            antipodal_blocked = retry.blocked,
            "Blocked ray, tried antipodal path"
        );
        if retry.blocked {
            primary
        } else {
            retry
        }
    }

    /// Interpolate at a geographic position, in degrees.
    pub fn interpolate_lat_lon(&self, lat: f64, lon: f64) -> Interpolation {
        self.interpolate_vector(&EarthShape::Wgs84.vector_degrees(lat, lon))
    }

    /// Interpolate at an earth-centered unit vector.
    pub fn interpolate_vector(&self, v: &UnitVector) -> Interpolation {
        let distance = geodesy::angle_degrees(&self.center, v);
        // undefined azimuth (source at the station, or station at a pole) reads as north
        let azimuth = geodesy::azimuth_degrees(&self.center, v, 0.0);
        self.interpolate(distance, azimuth)
    }

    /// Interpolate for a phase; T phases carry the hydroacoustic conversion bias.
    pub fn interpolate_for_phase(&self, v: &UnitVector, phase: Phase) -> Interpolation {
        let result = self.interpolate_vector(v);
        match phase {
            Phase::T => result.with_uncertainty_bias(self.ht_convert),
            Phase::H => result,
        }
    }

    /// Largest tabulated radius on the spokes bracketing `azimuth_deg`.
    pub fn max_distance(&self, azimuth_deg: f64) -> f64 {
        self.kernel.max_distance(azimuth_deg)
    }

    pub fn set_ht_convert(&mut self, ht_convert: f64) {
        self.ht_convert = ht_convert;
    }

    pub fn ht_convert(&self) -> f64 {
        self.ht_convert
    }

    /// Canonical path of the grid file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// File name of the grid (the station it was written for).
    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name of the directory holding the grid file.
    pub fn season(&self) -> String {
        self.source
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Label stored in the file.
    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn center(&self) -> &UnitVector {
        &self.center
    }

    pub fn lat(&self) -> f64 {
        EarthShape::Wgs84.lat_degrees(&self.center)
    }

    pub fn lon(&self) -> f64 {
        EarthShape::Wgs84.lon_degrees(&self.center)
    }

    pub fn policy(&self) -> InterpolationPolicy {
        self.kernel.policy()
    }

    pub fn kernel(&self) -> &GridKernel {
        &self.kernel
    }

    pub fn spoke_count(&self) -> usize {
        self.kernel.spoke_count()
    }

    pub fn delta(&self) -> f64 {
        self.kernel.delta()
    }

    pub fn dazimuth(&self) -> f64 {
        self.kernel.dazimuth()
    }

    pub fn azimuths(&self) -> &[f64] {
        self.kernel.azimuths()
    }

    pub fn travel_times(&self) -> &[Vec<f64>] {
        self.kernel.travel_times()
    }

    pub fn uncertainties(&self) -> &[Vec<f64>] {
        self.kernel.uncertainties()
    }

    /// Samples per spoke as read from the file, before any repair.
    pub fn native_lengths(&self) -> &[usize] {
        self.kernel.native_lengths()
    }

    pub fn spoke_radii(&self, spoke: usize) -> Vec<f64> {
        self.kernel.spoke_radii(spoke)
    }
}

impl PartialEq for RadialGridModel {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for RadialGridModel {}

impl Hash for RadialGridModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl fmt::Display for RadialGridModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} {:<8} {:10.4} {:10.4}",
            self.name(),
            self.season(),
            self.lat(),
            self.lon()
        )
    }
}
