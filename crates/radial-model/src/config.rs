//! Configuration for radial grid loading and interpolation.

use serde::{Deserialize, Serialize};

use crate::error::{RadialModelError, Result};
use crate::types::InterpolationPolicy;

/// Longest period label accepted by the reader.
pub const DEFAULT_MAX_LABEL_LEN: usize = 1024;

/// Hydroacoustic propagation used when extrapolating beyond a spoke, in s/deg.
pub const HYDRO_SEC_PER_DEG: f64 = 75.0;

/// Configuration for building radial grid models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Numeric kernel to build.
    pub policy: InterpolationPolicy,

    /// Maximum period label length in bytes.
    pub max_label_len: usize,

    /// Extrapolation speed beyond the end of a spoke, in seconds per degree.
    pub hydro_sec_per_deg: f64,

    /// Added to the uncertainty of every synthesized or extrapolated Improved cell.
    pub synthesized_uncertainty_penalty: f64,

    /// Legacy extrapolated-uncertainty ceiling, in degrees (and seconds).
    pub legacy_error_cap_deg: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            policy: InterpolationPolicy::default(),
            max_label_len: DEFAULT_MAX_LABEL_LEN,
            hydro_sec_per_deg: HYDRO_SEC_PER_DEG,
            synthesized_uncertainty_penalty: 30.0,
            legacy_error_cap_deg: 5.0,
        }
    }
}

impl ModelConfig {
    /// Config with the given policy and default constants.
    pub fn with_policy(policy: InterpolationPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `RADIAL2D_MODEL_POLICY` selects the kernel, `RADIAL2D_MAX_LABEL_LEN`
    /// overrides the label cap. An unparseable value is an error rather than
    /// a silent default.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("RADIAL2D_MODEL_POLICY") {
            config.policy = val.parse()?;
        }

        if let Ok(val) = std::env::var("RADIAL2D_MAX_LABEL_LEN") {
            config.max_label_len = val.parse().map_err(|_| {
                RadialModelError::config(format!("RADIAL2D_MAX_LABEL_LEN '{}' is not a size", val))
            })?;
        }

        config.validate().map_err(RadialModelError::Config)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.hydro_sec_per_deg > 0.0) {
            return Err("hydro_sec_per_deg must be > 0".to_string());
        }

        if !(self.synthesized_uncertainty_penalty >= 0.0) {
            return Err("synthesized_uncertainty_penalty must be >= 0".to_string());
        }

        if !(self.legacy_error_cap_deg > 0.0) {
            return Err("legacy_error_cap_deg must be > 0".to_string());
        }

        Ok(())
    }
}
