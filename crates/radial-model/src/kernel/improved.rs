//! Improved kernel: uniformly spaced spokes starting at a zero sample.
//!
//! Sample `i` of every spoke sits at radius `i * delta`, sample 0 being a
//! synthetic zero. Ragged spokes are padded once at load time from their
//! azimuthal neighbours; cells synthesized that way carry an uncertainty
//! penalty.

use tracing::{debug, warn};

use super::{azimuth_span, CornerSample, Stencil};
use crate::config::ModelConfig;
use crate::error::{RadialModelError, Result};
use crate::reader::RawGrid;

/// Largest azimuth spacing deviation still treated as uniform, in degrees.
const AZIMUTH_SPACING_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct ImprovedGrid {
    pub(crate) azimuths: Vec<f64>,
    pub(crate) dazimuth: f64,
    delta: f64,
    pub(crate) travel_times: Vec<Vec<f64>>,
    pub(crate) uncertainties: Vec<Vec<f64>>,
    pub(crate) native_lengths: Vec<usize>,
    pub(crate) hydro_sec_per_deg: f64,
    penalty: f64,
}

impl ImprovedGrid {
    pub(crate) fn new(raw: RawGrid, config: &ModelConfig) -> Result<Self> {
        let azimuths: Vec<f64> = raw.spokes.iter().map(|s| s.azimuth as f64).collect();
        let dazimuth = uniform_azimuth_spacing(&azimuths)?;

        let delta = raw.spokes.first().map_or(f32::NAN, |s| s.delta);
        if !raw.spokes.is_empty() && !(delta > 0.0 && delta.is_finite()) {
            return Err(RadialModelError::InvalidSpacing {
                what: "radial step",
                value: delta as f64,
            });
        }
        for (i, spoke) in raw.spokes.iter().enumerate().skip(1) {
            if spoke.delta != delta {
                return Err(RadialModelError::NonUniformDelta {
                    spoke: i,
                    expected: delta as f64,
                    found: spoke.delta as f64,
                });
            }
        }
        let delta = delta as f64;

        let mut travel_times = Vec::with_capacity(raw.spokes.len());
        let mut uncertainties = Vec::with_capacity(raw.spokes.len());
        for spoke in raw.spokes {
            travel_times.push(with_origin(spoke.travel_times));
            uncertainties.push(with_origin(spoke.uncertainties));
        }
        let native_lengths = travel_times.iter().map(Vec::len).collect();

        let mut grid = Self {
            azimuths,
            dazimuth,
            delta,
            travel_times,
            uncertainties,
            native_lengths,
            hydro_sec_per_deg: config.hydro_sec_per_deg,
            penalty: config.synthesized_uncertainty_penalty,
        };
        grid.fill_holes();
        Ok(grid)
    }

    pub(crate) fn delta(&self) -> f64 {
        self.delta
    }

    /// Pad ragged spokes up to the longest spoke.
    ///
    /// A missing sample becomes the mean of the same sample on the previous
    /// and next spoke, whichever exist. With neither, the first missing
    /// sample extends the spoke's own last value by one hydroacoustic step;
    /// any later gap ends the spoke. All additions are computed from the
    /// unrepaired grid and get the uncertainty penalty.
    fn fill_holes(&mut self) {
        let naz = self.travel_times.len();
        let Some(nr_max) = self.travel_times.iter().map(Vec::len).max() else {
            return;
        };
        let step_tt = self.hydro_sec_per_deg * self.delta;
        let (tt, unc) = (&self.travel_times, &self.uncertainties);

        let mut additions: Vec<Vec<(f64, f64)>> = Vec::with_capacity(naz);
        for i in 0..naz {
            let neighbours = [(i + naz - 1) % naz, (i + 1) % naz];
            let len = tt[i].len();
            let mut added = Vec::new();

            for j in len..nr_max {
                let mut sum = (0.0, 0.0);
                let mut count = 0usize;
                for &n in &neighbours {
                    if n != i && tt[n].len() > j {
                        sum.0 += tt[n][j];
                        sum.1 += unc[n][j];
                        count += 1;
                    }
                }
                if count == 0 && j == len && j > 0 {
                    sum = (tt[i][j - 1] + step_tt, unc[i][j - 1]);
                    count = 1;
                }
                if count == 0 {
                    warn!(spoke = i, length = j, target = nr_max, "Spoke left short by hole filling");
                    break;
                }
                added.push((sum.0 / count as f64, sum.1 / count as f64));
            }
            additions.push(added);
        }

        for (i, added) in additions.into_iter().enumerate() {
            if added.is_empty() {
                continue;
            }
            debug!(spoke = i, filled = added.len(), "Filled ragged spoke");
            for (t, u) in added {
                self.travel_times[i].push(t);
                self.uncertainties[i].push(u + self.penalty);
            }
        }
    }

    /// Fractional spoke position of `azimuth`, split into index and fraction.
    fn azimuth_position(&self, azimuth: f64) -> (usize, f64) {
        let pos = azimuth_span(azimuth, self.azimuths[0]) / self.dazimuth;
        let i = pos.floor();
        (i as usize % self.azimuths.len(), pos - i)
    }

    fn sample(&self, spoke: usize, index: usize) -> CornerSample {
        let len = self.travel_times[spoke].len();
        if index < len {
            CornerSample::Node(index)
        } else {
            CornerSample::Beyond {
                steps: index + 1 - len,
            }
        }
    }

    pub(crate) fn stencil(&self, distance: f64, azimuth: f64) -> Stencil {
        let (iaz1, ca) = self.azimuth_position(azimuth);
        let iaz2 = (iaz1 + 1) % self.azimuths.len();

        let rpos = distance / self.delta;
        let ir1 = rpos.floor() as usize;
        let cr = rpos - ir1 as f64;

        Stencil {
            spokes: [iaz1, iaz2],
            samples: [
                [self.sample(iaz1, ir1), self.sample(iaz1, ir1 + 1)],
                [self.sample(iaz2, ir1), self.sample(iaz2, ir1 + 1)],
            ],
            azimuth_fraction: ca,
            radial_fractions: [cr, cr],
        }
    }

    pub(crate) fn corner_value(&self, spoke: usize, sample: CornerSample) -> (f64, f64) {
        let (tt, unc) = (&self.travel_times[spoke], &self.uncertainties[spoke]);
        match sample {
            CornerSample::Origin => (0.0, 0.0),
            CornerSample::Node(i) => (tt[i], unc[i]),
            CornerSample::Beyond { steps } => {
                // every spoke holds at least its synthetic zero
                let last = tt.len() - 1;
                (
                    tt[last] + self.hydro_sec_per_deg * self.delta * steps as f64,
                    unc[last] + self.penalty,
                )
            }
        }
    }

    /// Radius of the last sample shared by both bracketing spokes.
    pub(crate) fn max_distance(&self, azimuth: f64) -> f64 {
        let (a1, _) = self.azimuth_position(azimuth);
        let a2 = (a1 + 1) % self.azimuths.len();
        let shared = self.travel_times[a1].len().min(self.travel_times[a2].len());
        self.delta * shared.saturating_sub(1) as f64
    }

    pub(crate) fn spoke_radii(&self, i: usize) -> Vec<f64> {
        (0..self.travel_times[i].len())
            .map(|j| j as f64 * self.delta)
            .collect()
    }
}

fn with_origin(samples: Vec<f32>) -> Vec<f64> {
    std::iter::once(0.0)
        .chain(samples.into_iter().map(f64::from))
        .collect()
}

/// Common spacing of consecutive azimuths, including the wrap from the last
/// spoke to the first; a lone spoke covers 360 degrees.
fn uniform_azimuth_spacing(azimuths: &[f64]) -> Result<f64> {
    let (a0, a1) = match azimuths {
        [a0, a1, ..] => (*a0, *a1),
        _ => return Ok(360.0),
    };
    let dazimuth = a1 - a0;
    if !(dazimuth > 0.0) {
        return Err(RadialModelError::InvalidSpacing {
            what: "azimuth spacing",
            value: dazimuth,
        });
    }
    for (i, pair) in azimuths.windows(2).enumerate().skip(1) {
        let found = pair[1] - pair[0];
        if (found - dazimuth).abs() > AZIMUTH_SPACING_TOLERANCE {
            return Err(RadialModelError::NonUniformAzimuth {
                spoke: i + 1,
                expected: dazimuth,
                found,
            });
        }
    }
    // the gap from the last spoke back around to the first
    let found = azimuths[0] + 360.0 - azimuths[azimuths.len() - 1];
    if (found - dazimuth).abs() > AZIMUTH_SPACING_TOLERANCE {
        return Err(RadialModelError::NonUniformAzimuth {
            spoke: 0,
            expected: dazimuth,
            found,
        });
    }
    Ok(dazimuth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_grid;
    use crate::types::InterpolationPolicy;
    use test_utils::{GridBuilder, SpokeSpec};

    fn build(builder: GridBuilder) -> Result<ImprovedGrid> {
        let raw = parse_grid(builder.encode(), 1024).unwrap();
        ImprovedGrid::new(raw, &ModelConfig::with_policy(InterpolationPolicy::Improved))
    }

    #[test]
    fn test_synthetic_origin() {
        let g = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[10.0, 20.0], &[1.0, 2.0]))
            .spoke(SpokeSpec::new(180.0, 1.0, &[12.0, 22.0], &[1.0, 2.0])))
        .unwrap();
        assert_eq!(g.travel_times[0], vec![0.0, 10.0, 20.0]);
        assert_eq!(g.uncertainties[1], vec![0.0, 1.0, 2.0]);
        assert_eq!(g.native_lengths, vec![3, 3]);
        assert_eq!(g.dazimuth, 180.0);
        assert_eq!(g.spoke_radii(0), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rejects_uneven_azimuths() {
        let err = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[1.0], &[1.0]))
            .spoke(SpokeSpec::new(90.0, 1.0, &[1.0], &[1.0]))
            .spoke(SpokeSpec::new(200.0, 1.0, &[1.0], &[1.0])))
        .unwrap_err();
        assert!(matches!(err, RadialModelError::NonUniformAzimuth { spoke: 2, .. }), "{}", err);
    }

    #[test]
    fn test_rejects_open_azimuth_fan() {
        // evenly spaced, but 180-360 is not covered
        let err = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[10.0], &[1.0]))
            .spoke(SpokeSpec::new(90.0, 1.0, &[11.0], &[1.0]))
            .spoke(SpokeSpec::new(180.0, 1.0, &[12.0], &[1.0])))
        .unwrap_err();
        assert!(
            matches!(err, RadialModelError::NonUniformAzimuth { spoke: 0, expected, found }
                if expected == 90.0 && found == 180.0),
            "{}",
            err
        );
    }

    #[test]
    fn test_accepts_fan_not_starting_at_north() {
        let g = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(60.0, 1.0, &[10.0], &[1.0]))
            .spoke(SpokeSpec::new(180.0, 1.0, &[11.0], &[1.0]))
            .spoke(SpokeSpec::new(300.0, 1.0, &[12.0], &[1.0])))
        .unwrap();
        assert_eq!(g.dazimuth, 120.0);
    }

    #[test]
    fn test_rejects_uneven_delta() {
        let err = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[1.0], &[1.0]))
            .spoke(SpokeSpec::new(180.0, 0.5, &[1.0], &[1.0])))
        .unwrap_err();
        assert!(matches!(err, RadialModelError::NonUniformDelta { spoke: 1, .. }), "{}", err);
    }

    #[test]
    fn test_rejects_zero_delta() {
        let err = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 0.0, &[1.0], &[1.0])))
        .unwrap_err();
        assert!(matches!(err, RadialModelError::InvalidSpacing { .. }));
    }

    #[test]
    fn test_hole_filling_uses_neighbour_mean() {
        let g = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[10.0, 20.0, 30.0, 40.0], &[1.0, 2.0, 3.0, 4.0]))
            .spoke(SpokeSpec::new(120.0, 1.0, &[11.0, 21.0], &[1.0, 2.0]))
            .spoke(SpokeSpec::new(240.0, 1.0, &[12.0, 22.0, 32.0, 42.0], &[3.0, 4.0, 5.0, 6.0])))
        .unwrap();

        assert_eq!(g.native_lengths, vec![5, 3, 5]);
        assert_eq!(g.travel_times[1].len(), 5);
        assert_eq!(&g.travel_times[1][3..], &[31.0, 41.0]);
        assert_eq!(&g.uncertainties[1][3..], &[4.0 + 30.0, 5.0 + 30.0]);
        // complete spokes are untouched
        assert_eq!(g.travel_times[0].len(), 5);
    }

    #[test]
    fn test_hole_filling_self_extrapolates_one_step() {
        let g = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[10.0], &[1.0]))
            .spoke(SpokeSpec::new(120.0, 1.0, &[11.0], &[1.5]))
            .spoke(SpokeSpec::new(240.0, 1.0, &[12.0, 22.0, 32.0], &[1.0, 2.0, 3.0])))
        .unwrap();

        // spoke 1 neighbours are spokes 0 and 2; spoke 2 covers index 2 and 3
        assert_eq!(g.travel_times[1], vec![0.0, 11.0, 22.0, 32.0]);

        let g = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[10.0], &[1.0]))
            .spoke(SpokeSpec::new(90.0, 1.0, &[11.0], &[1.5]))
            .spoke(SpokeSpec::new(180.0, 1.0, &[12.0], &[1.0]))
            .spoke(SpokeSpec::new(270.0, 1.0, &[13.0, 23.0, 33.0], &[1.0, 2.0, 3.0])))
        .unwrap();

        // spoke 1 has no neighbour with index 2: one self step, then stop
        assert_eq!(g.travel_times[1], vec![0.0, 11.0, 11.0 + 75.0]);
        assert_eq!(g.uncertainties[1], vec![0.0, 1.5, 1.5 + 30.0]);
        // spoke 0 borrows from spoke 3 for both missing samples
        assert_eq!(g.travel_times[0], vec![0.0, 10.0, 23.0, 33.0]);
    }

    #[test]
    fn test_stencil_and_extrapolation() {
        let g = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[10.0, 20.0], &[1.0, 1.0]))
            .spoke(SpokeSpec::new(90.0, 1.0, &[11.0, 21.0], &[1.0, 1.0]))
            .spoke(SpokeSpec::new(180.0, 1.0, &[12.0, 22.0], &[1.0, 1.0]))
            .spoke(SpokeSpec::new(270.0, 1.0, &[13.0, 23.0], &[1.0, 1.0])))
        .unwrap();

        let st = g.stencil(1.25, 315.0);
        assert_eq!(st.spokes, [3, 0]);
        assert!((st.azimuth_fraction - 0.5).abs() < 1e-12);
        assert_eq!(st.samples[0], [CornerSample::Node(1), CornerSample::Node(2)]);

        let st = g.stencil(2.5, 0.0);
        assert_eq!(st.samples[0], [CornerSample::Node(2), CornerSample::Beyond { steps: 1 }]);
        assert_eq!(g.corner_value(0, CornerSample::Beyond { steps: 1 }), (95.0, 31.0));

        let st = g.stencil(3.5, 0.0);
        assert!(st.is_blocked());

        assert_eq!(g.max_distance(45.0), 2.0);
    }

    #[test]
    fn test_single_spoke_covers_circle() {
        let g = build(GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(0.0, 1.0, &[10.0], &[1.0])))
        .unwrap();
        assert_eq!(g.dazimuth, 360.0);
        let st = g.stencil(0.5, 200.0);
        assert_eq!(st.spokes, [0, 0]);
    }
}
