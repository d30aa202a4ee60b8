//! Legacy kernel: ragged spokes with their own radial step.
//!
//! Sample `i` of a spoke sits at radius `(i + 1) * delta`; the station itself
//! is an implicit zero. Past the end of a spoke travel time grows at a fixed
//! hydroacoustic speed and the uncertainty is the queried radius, capped.

use super::{azimuth_span, CornerSample, Stencil};
use crate::config::ModelConfig;
use crate::error::{RadialModelError, Result};
use crate::reader::RawGrid;

#[derive(Debug, Clone)]
pub struct LegacyGrid {
    pub(crate) azimuths: Vec<f64>,
    pub(crate) deltas: Vec<f64>,
    pub(crate) travel_times: Vec<Vec<f64>>,
    pub(crate) uncertainties: Vec<Vec<f64>>,
    pub(crate) native_lengths: Vec<usize>,
    pub(crate) hydro_sec_per_deg: f64,
    error_cap_deg: f64,
}

impl LegacyGrid {
    pub(crate) fn new(raw: RawGrid, config: &ModelConfig) -> Result<Self> {
        let n = raw.spokes.len();
        let mut grid = Self {
            azimuths: Vec::with_capacity(n),
            deltas: Vec::with_capacity(n),
            travel_times: Vec::with_capacity(n),
            uncertainties: Vec::with_capacity(n),
            native_lengths: Vec::with_capacity(n),
            hydro_sec_per_deg: config.hydro_sec_per_deg,
            error_cap_deg: config.legacy_error_cap_deg,
        };

        for spoke in raw.spokes {
            if !(spoke.delta > 0.0 && spoke.delta.is_finite()) {
                return Err(RadialModelError::InvalidSpacing {
                    what: "radial step",
                    value: spoke.delta as f64,
                });
            }
            grid.azimuths.push(spoke.azimuth as f64);
            grid.deltas.push(spoke.delta as f64);
            grid.native_lengths.push(spoke.travel_times.len());
            grid.travel_times
                .push(spoke.travel_times.into_iter().map(f64::from).collect());
            grid.uncertainties
                .push(spoke.uncertainties.into_iter().map(f64::from).collect());
        }

        Ok(grid)
    }

    /// Index of the last spoke with azimuth `<= azimuth`; before the first
    /// spoke this wraps to the last one.
    fn hunt(&self, azimuth: f64) -> usize {
        match self.azimuths.partition_point(|&a| a <= azimuth) {
            0 => self.azimuths.len() - 1,
            n => n - 1,
        }
    }

    fn next(&self, i: usize) -> usize {
        (i + 1) % self.azimuths.len()
    }

    pub(crate) fn stencil(&self, distance: f64, azimuth: f64) -> Stencil {
        let iaz = self.hunt(azimuth);
        let jaz = self.next(iaz);

        // a lone spoke (or a repeated azimuth) spans the full circle
        let span = match azimuth_span(self.azimuths[jaz], self.azimuths[iaz]) {
            s if s > 0.0 => s,
            _ => 360.0,
        };
        let azimuth_fraction = azimuth_span(azimuth, self.azimuths[iaz]) / span;

        let mut samples = [[CornerSample::Origin; 2]; 2];
        let mut radial_fractions = [0.0; 2];
        for (k, spoke) in [iaz, jaz].into_iter().enumerate() {
            let delta = self.deltas[spoke];
            let nrad = self.travel_times[spoke].len();
            let d = (distance / delta) as usize;
            for (l, sample) in samples[k].iter_mut().enumerate() {
                let pos = d.saturating_add(l);
                *sample = if pos > nrad {
                    CornerSample::Beyond { steps: pos - nrad }
                } else if pos > 0 {
                    CornerSample::Node(pos - 1)
                } else {
                    CornerSample::Origin
                };
            }
            radial_fractions[k] = (distance - d as f64 * delta) / delta;
        }

        Stencil {
            spokes: [iaz, jaz],
            samples,
            azimuth_fraction,
            radial_fractions,
        }
    }

    pub(crate) fn corner_value(&self, spoke: usize, sample: CornerSample) -> (f64, f64) {
        match sample {
            CornerSample::Origin => (0.0, 0.0),
            CornerSample::Node(i) => (self.travel_times[spoke][i], self.uncertainties[spoke][i]),
            CornerSample::Beyond { steps } => {
                let delta = self.deltas[spoke];
                let tt = &self.travel_times[spoke];
                let last = tt.last().copied().unwrap_or(0.0);
                let travel_time = last + self.hydro_sec_per_deg * delta * steps as f64;
                let radius = (tt.len() + steps) as f64 * delta;
                (travel_time, radius.min(self.error_cap_deg))
            }
        }
    }

    pub(crate) fn max_distance(&self, azimuth: f64) -> f64 {
        let i1 = self.hunt(azimuth);
        let i2 = self.next(i1);
        let extent = |i: usize| self.deltas[i] * self.travel_times[i].len() as f64;
        extent(i1).max(extent(i2))
    }

    /// Spacing between the first two spokes, or a full circle for one spoke.
    pub(crate) fn dazimuth(&self) -> f64 {
        match self.azimuths.as_slice() {
            [a0, a1, ..] => a1 - a0,
            _ => 360.0,
        }
    }

    pub(crate) fn spoke_radii(&self, i: usize) -> Vec<f64> {
        let delta = self.deltas[i];
        (1..=self.travel_times[i].len())
            .map(|j| j as f64 * delta)
            .collect()
    }
}
