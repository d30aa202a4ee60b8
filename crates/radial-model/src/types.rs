//! Core types shared by the interpolation kernels.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::RadialModelError;

/// Which numeric kernel a model uses.
///
/// Both read the same file format. `Legacy` reproduces the historical C
/// behaviour (ragged spokes, per-spoke radial step, constant-speed
/// extrapolation). `Improved` requires uniform spacing, starts every spoke
/// at a zero sample and repairs ragged spokes once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationPolicy {
    Legacy,
    #[default]
    Improved,
}

impl InterpolationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Improved => "improved",
        }
    }
}

impl FromStr for InterpolationPolicy {
    type Err = RadialModelError;

    /// Accepts `legacy`/`improved` and the historical class names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" | "radial2dmodellegacy" => Ok(Self::Legacy),
            "improved" | "radial2dmodelimproved" => Ok(Self::Improved),
            other => Err(RadialModelError::config(format!(
                "unknown interpolation policy '{}', expected legacy or improved",
                other
            ))),
        }
    }
}

impl std::fmt::Display for InterpolationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Seismic phase of a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Hydroacoustic T phase, converted to seismic energy at the receiver.
    T,
    /// Hydroacoustic H phase recorded by a hydrophone.
    H,
}

impl FromStr for Phase {
    type Err = RadialModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "T" | "t" => Ok(Self::T),
            "H" | "h" => Ok(Self::H),
            other => Err(RadialModelError::config(format!("unsupported phase '{}'", other))),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::T => write!(f, "T"),
            Self::H => write!(f, "H"),
        }
    }
}

/// Result of one travel-time query against a model.
///
/// Distance and azimuth are always present. When `blocked` is set the
/// travel time, uncertainty and slowness are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interpolation {
    /// Receiver-to-source distance in degrees.
    pub distance_deg: f64,
    /// Receiver-to-source azimuth in degrees, in `[0, 360)`.
    pub azimuth_deg: f64,
    /// Travel time in seconds.
    pub travel_time: Option<f64>,
    /// Travel time uncertainty in seconds.
    pub uncertainty: Option<f64>,
    /// Slowness in seconds per degree.
    pub slowness_deg: Option<f64>,
    /// Slowness in seconds per radian.
    pub slowness_rad: Option<f64>,
    /// Every interpolation corner lay beyond its spoke.
    pub blocked: bool,
    /// Number of corners (0-4) that had to be extrapolated.
    pub extrapolated_corners: u8,
}

impl Interpolation {
    pub(crate) fn blocked(distance_deg: f64, azimuth_deg: f64, extrapolated_corners: u8) -> Self {
        Self {
            distance_deg,
            azimuth_deg,
            travel_time: None,
            uncertainty: None,
            slowness_deg: None,
            slowness_rad: None,
            blocked: true,
            extrapolated_corners,
        }
    }

    /// Distance in radians.
    pub fn distance_rad(&self) -> f64 {
        self.distance_deg.to_radians()
    }

    /// Azimuth in radians.
    pub fn azimuth_rad(&self) -> f64 {
        self.azimuth_deg.to_radians()
    }

    /// Add a constant bias to the uncertainty, if there is one.
    pub fn with_uncertainty_bias(mut self, bias: f64) -> Self {
        self.uncertainty = self.uncertainty.map(|u| u + bias);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("legacy".parse::<InterpolationPolicy>().unwrap(), InterpolationPolicy::Legacy);
        assert_eq!(
            "Radial2DModelImproved".parse::<InterpolationPolicy>().unwrap(),
            InterpolationPolicy::Improved
        );
        assert_eq!(" IMPROVED ".parse::<InterpolationPolicy>().unwrap(), InterpolationPolicy::Improved);
        assert!("bicubic".parse::<InterpolationPolicy>().is_err());
    }

    #[test]
    fn test_phase_parsing() {
        assert_eq!("T".parse::<Phase>().unwrap(), Phase::T);
        assert_eq!("h".parse::<Phase>().unwrap(), Phase::H);
        assert!("Pn".parse::<Phase>().is_err());
    }

    #[test]
    fn test_bias_skips_blocked() {
        let blocked = Interpolation::blocked(10.0, 20.0, 4);
        assert_eq!(blocked.with_uncertainty_bias(3.0).uncertainty, None);
    }
}
