//! Radial derivatives of a travel-time grid.
//!
//! Per-node slowness (dt/dr) and, for the second-order variant, its radial
//! gradient (d2t/dr2), blended with the same stencil the base model uses for
//! travel times.

use serde::Serialize;

use crate::kernel::{CornerSample, Stencil};
use crate::model::RadialGridModel;
use crate::numerics::CubicSpline;

/// Slowness (and optionally its gradient) at one query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivativeSample {
    /// s/deg
    pub slowness_deg: f64,
    /// s/rad
    pub slowness_rad: f64,
    /// s/deg^2, second-order tables only
    pub slowness_gradient: Option<f64>,
}

/// Derivative tables computed once from a model.
#[derive(Debug, Clone)]
pub struct RadialDerivatives<'a> {
    model: &'a RadialGridModel,
    slowness: Vec<Vec<f64>>,
    gradient: Option<Vec<Vec<f64>>>,
}

impl<'a> RadialDerivatives<'a> {
    /// Finite differences: central at interior nodes, one-sided at the ends.
    /// Spokes with fewer than two samples get NaN.
    pub fn first_order(model: &'a RadialGridModel) -> Self {
        let slowness = (0..model.spoke_count())
            .map(|i| finite_differences(&model.spoke_radii(i), &model.travel_times()[i]))
            .collect();
        Self {
            model,
            slowness,
            gradient: None,
        }
    }

    /// Per-spoke natural cubic spline of travel time against radius.
    ///
    /// Two-sample spokes fall back to a straight line; shorter spokes get NaN.
    pub fn second_order(model: &'a RadialGridModel) -> Self {
        let mut slowness = Vec::with_capacity(model.spoke_count());
        let mut gradient = Vec::with_capacity(model.spoke_count());

        for i in 0..model.spoke_count() {
            let radii = model.spoke_radii(i);
            let tt = &model.travel_times()[i];
            if radii.len() >= 3 {
                let spline = CubicSpline::fit(&radii, tt);
                let (s, g): (Vec<f64>, Vec<f64>) = radii
                    .iter()
                    .map(|&r| {
                        let p = spline.evaluate(r);
                        (p.first_derivative, p.second_derivative)
                    })
                    .unzip();
                slowness.push(s);
                gradient.push(g);
            } else {
                let s = finite_differences(&radii, tt);
                let flat = if radii.len() == 2 { 0.0 } else { f64::NAN };
                gradient.push(vec![flat; s.len()]);
                slowness.push(s);
            }
        }

        Self {
            model,
            slowness,
            gradient: Some(gradient),
        }
    }

    pub fn model(&self) -> &RadialGridModel {
        self.model
    }

    /// Slowness at sample `node` of `spoke`, in s/deg.
    pub fn node_slowness(&self, spoke: usize, node: usize) -> f64 {
        self.slowness[spoke][node]
    }

    /// Radial slowness gradient at a node, in s/deg^2; `None` for first-order tables.
    pub fn node_slowness_gradient(&self, spoke: usize, node: usize) -> Option<f64> {
        self.gradient.as_ref().map(|g| g[spoke][node])
    }

    /// Blend node derivatives at a distance and azimuth, in degrees.
    ///
    /// Follows the base model's antipodal retry; `None` when both paths are
    /// blocked.
    pub fn interpolate(&self, distance_deg: f64, azimuth_deg: f64) -> Option<DerivativeSample> {
        let kernel = self.model.kernel();
        let azimuth = azimuth_deg.rem_euclid(360.0);
        let mut stencil = kernel.stencil(distance_deg, azimuth);
        if stencil.is_blocked() {
            stencil = kernel.stencil(360.0 - distance_deg, (azimuth + 180.0).rem_euclid(360.0));
            if stencil.is_blocked() {
                return None;
            }
        }

        let beyond = kernel.hydro_sec_per_deg();
        let slowness_deg = blend_table(&stencil, &self.slowness, beyond);
        let slowness_gradient = self
            .gradient
            .as_ref()
            .map(|g| blend_table(&stencil, g, 0.0));

        Some(DerivativeSample {
            slowness_deg,
            slowness_rad: slowness_deg.to_degrees(),
            slowness_gradient,
        })
    }
}

/// Beyond a spoke the value is `beyond`; before the first node it is the first node's.
fn blend_table(stencil: &Stencil, table: &[Vec<f64>], beyond: f64) -> f64 {
    stencil.blend(|spoke, sample| match sample {
        CornerSample::Node(i) => table[spoke][i],
        CornerSample::Origin => table[spoke].first().copied().unwrap_or(f64::NAN),
        CornerSample::Beyond { .. } => beyond,
    })
}

fn finite_differences(r: &[f64], t: &[f64]) -> Vec<f64> {
    let n = r.len();
    if n < 2 {
        return vec![f64::NAN; n];
    }
    (0..n)
        .map(|j| {
            let (lo, hi) = match j {
                0 => (0, 1),
                j if j == n - 1 => (j - 1, j),
                j => (j - 1, j + 1),
            };
            (t[hi] - t[lo]) / (r[hi] - r[lo])
        })
        .collect()
}
