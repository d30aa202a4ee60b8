//! Numeric kernels behind [`RadialGridModel`](crate::RadialGridModel).
//!
//! Both kernels reduce a query to a [`Stencil`]: two azimuth spokes, two
//! radial samples on each, and bilinear weights. Anything that can be
//! tabulated per node (travel time, uncertainty, slowness) is blended through
//! the same stencil.

mod improved;
mod legacy;

pub use improved::ImprovedGrid;
pub use legacy::LegacyGrid;

use crate::config::ModelConfig;
use crate::error::Result;
use crate::reader::RawGrid;
use crate::types::{InterpolationPolicy, Interpolation};

/// Where one interpolation corner falls on its spoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CornerSample {
    /// Before the first tabulated radius; travel time and uncertainty are zero.
    Origin,
    /// A tabulated sample.
    Node(usize),
    /// `steps` radial steps past the last tabulated sample.
    Beyond { steps: usize },
}

impl CornerSample {
    pub(crate) fn is_beyond(&self) -> bool {
        matches!(self, Self::Beyond { .. })
    }
}

/// Two spokes, two radial samples per spoke, and their blend weights.
///
/// `samples[k][l]` is radial sample `l` on spoke `spokes[k]`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Stencil {
    pub spokes: [usize; 2],
    pub samples: [[CornerSample; 2]; 2],
    pub azimuth_fraction: f64,
    pub radial_fractions: [f64; 2],
}

impl Stencil {
    fn weight(&self, k: usize, l: usize) -> f64 {
        let wa = if k == 0 {
            1.0 - self.azimuth_fraction
        } else {
            self.azimuth_fraction
        };
        let cr = self.radial_fractions[k];
        let wr = if l == 0 { 1.0 - cr } else { cr };
        wa * wr
    }

    /// Bilinear blend of a per-corner value.
    pub(crate) fn blend(&self, mut value: impl FnMut(usize, CornerSample) -> f64) -> f64 {
        let mut sum = 0.0;
        for k in 0..2 {
            for l in 0..2 {
                sum += self.weight(k, l) * value(self.spokes[k], self.samples[k][l]);
            }
        }
        sum
    }

    /// Blend across azimuth only, at radial sample `l`.
    pub(crate) fn blend_row(&self, l: usize, mut value: impl FnMut(usize, CornerSample) -> f64) -> f64 {
        value(self.spokes[0], self.samples[0][l]) * (1.0 - self.azimuth_fraction)
            + value(self.spokes[1], self.samples[1][l]) * self.azimuth_fraction
    }

    pub(crate) fn extrapolated_corners(&self) -> u8 {
        self.samples
            .iter()
            .flatten()
            .filter(|s| s.is_beyond())
            .count() as u8
    }

    pub(crate) fn is_blocked(&self) -> bool {
        self.extrapolated_corners() == 4
    }
}

/// Wrap-aware angular difference `az2 - az1`, in `[0, 360)`.
pub(crate) fn azimuth_span(az2: f64, az1: f64) -> f64 {
    (az2 - az1 + 360.0).rem_euclid(360.0)
}

/// One of the two numeric kernels.
#[derive(Debug, Clone)]
pub enum GridKernel {
    Legacy(LegacyGrid),
    Improved(ImprovedGrid),
}

impl GridKernel {
    /// Build the kernel selected by `config.policy` from a parsed grid.
    pub fn build(raw: RawGrid, config: &ModelConfig) -> Result<Self> {
        match config.policy {
            InterpolationPolicy::Legacy => Ok(Self::Legacy(LegacyGrid::new(raw, config)?)),
            InterpolationPolicy::Improved => Ok(Self::Improved(ImprovedGrid::new(raw, config)?)),
        }
    }

    pub fn policy(&self) -> InterpolationPolicy {
        match self {
            Self::Legacy(_) => InterpolationPolicy::Legacy,
            Self::Improved(_) => InterpolationPolicy::Improved,
        }
    }

    pub fn spoke_count(&self) -> usize {
        self.azimuths().len()
    }

    pub(crate) fn stencil(&self, distance: f64, azimuth: f64) -> Stencil {
        assert!(self.spoke_count() > 0, "radial grid has no spokes");
        match self {
            Self::Legacy(g) => g.stencil(distance, azimuth),
            Self::Improved(g) => g.stencil(distance, azimuth),
        }
    }

    /// Travel time and uncertainty at one corner.
    pub(crate) fn corner_value(&self, spoke: usize, sample: CornerSample) -> (f64, f64) {
        match self {
            Self::Legacy(g) => g.corner_value(spoke, sample),
            Self::Improved(g) => g.corner_value(spoke, sample),
        }
    }

    /// Single interpolation without the antipodal retry.
    ///
    /// `azimuth` must already be normalized to `[0, 360)`.
    pub fn evaluate(&self, distance: f64, azimuth: f64) -> Interpolation {
        let stencil = self.stencil(distance, azimuth);
        let corners = stencil.extrapolated_corners();
        if stencil.is_blocked() {
            return Interpolation::blocked(distance, azimuth, corners);
        }

        let travel_time = stencil.blend(|s, c| self.corner_value(s, c).0);
        let uncertainty = stencil.blend(|s, c| self.corner_value(s, c).1);

        let (slowness_deg, slowness_rad) = if distance > 0.0 {
            (Some(travel_time / distance), Some(travel_time / distance.to_radians()))
        } else {
            match self {
                // legacy reports no slowness at the station itself
                Self::Legacy(_) => (None, None),
                Self::Improved(g) => {
                    let t1 = stencil.blend_row(0, |s, c| self.corner_value(s, c).0);
                    let t2 = stencil.blend_row(1, |s, c| self.corner_value(s, c).0);
                    let delta = g.delta();
                    (Some((t2 - t1) / delta), Some((t2 - t1) / delta.to_radians()))
                }
            }
        };

        Interpolation {
            distance_deg: distance,
            azimuth_deg: azimuth,
            travel_time: Some(travel_time),
            uncertainty: Some(uncertainty),
            slowness_deg,
            slowness_rad,
            blocked: false,
            extrapolated_corners: corners,
        }
    }

    pub fn max_distance(&self, azimuth: f64) -> f64 {
        assert!(self.spoke_count() > 0, "radial grid has no spokes");
        let azimuth = azimuth.rem_euclid(360.0);
        match self {
            Self::Legacy(g) => g.max_distance(azimuth),
            Self::Improved(g) => g.max_distance(azimuth),
        }
    }

    pub fn azimuths(&self) -> &[f64] {
        match self {
            Self::Legacy(g) => &g.azimuths,
            Self::Improved(g) => &g.azimuths,
        }
    }

    pub fn travel_times(&self) -> &[Vec<f64>] {
        match self {
            Self::Legacy(g) => &g.travel_times,
            Self::Improved(g) => &g.travel_times,
        }
    }

    pub fn uncertainties(&self) -> &[Vec<f64>] {
        match self {
            Self::Legacy(g) => &g.uncertainties,
            Self::Improved(g) => &g.uncertainties,
        }
    }

    pub fn native_lengths(&self) -> &[usize] {
        match self {
            Self::Legacy(g) => &g.native_lengths,
            Self::Improved(g) => &g.native_lengths,
        }
    }

    /// Radial step of the first spoke (Legacy) or of the whole grid (Improved).
    pub fn delta(&self) -> f64 {
        match self {
            Self::Legacy(g) => g.deltas.first().copied().unwrap_or(f64::NAN),
            Self::Improved(g) => g.delta(),
        }
    }

    pub fn dazimuth(&self) -> f64 {
        match self {
            Self::Legacy(g) => g.dazimuth(),
            Self::Improved(g) => g.dazimuth,
        }
    }

    /// Radius in degrees of every tabulated sample on spoke `i`.
    pub fn spoke_radii(&self, i: usize) -> Vec<f64> {
        match self {
            Self::Legacy(g) => g.spoke_radii(i),
            Self::Improved(g) => g.spoke_radii(i),
        }
    }

    /// Slowness beyond the end of a spoke, in s/deg.
    pub(crate) fn hydro_sec_per_deg(&self) -> f64 {
        match self {
            Self::Legacy(g) => g.hydro_sec_per_deg,
            Self::Improved(g) => g.hydro_sec_per_deg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_azimuth_span_wraps() {
        assert_eq!(azimuth_span(90.0, 0.0), 90.0);
        assert_eq!(azimuth_span(0.0, 270.0), 90.0);
        assert_eq!(azimuth_span(10.0, 10.0), 0.0);
        assert!((azimuth_span(0.1, 359.9) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_stencil_weights_sum_to_one() {
        let stencil = Stencil {
            spokes: [0, 1],
            samples: [
                [CornerSample::Node(0), CornerSample::Node(1)],
                [CornerSample::Node(0), CornerSample::Beyond { steps: 1 }],
            ],
            azimuth_fraction: 0.3,
            radial_fractions: [0.25, 0.6],
        };
        assert!((stencil.blend(|_, _| 1.0) - 1.0).abs() < 1e-12);
        assert_eq!(stencil.extrapolated_corners(), 1);
        assert!(!stencil.is_blocked());
    }
}
