//! Synthetic radial grid files.
//!
//! [`GridBuilder`] writes the big-endian grid layout byte for byte, so tests
//! can describe a grid spoke by spoke and feed the result to the reader or
//! drop it into a library directory.

use bytes::{BufMut, Bytes, BytesMut};

/// One spoke of a synthetic grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SpokeSpec {
    pub azimuth: f32,
    pub delta: f32,
    pub travel_times: Vec<f32>,
    pub uncertainties: Vec<f32>,
}

impl SpokeSpec {
    pub fn new(azimuth: f32, delta: f32, travel_times: &[f32], uncertainties: &[f32]) -> Self {
        Self {
            azimuth,
            delta,
            travel_times: travel_times.to_vec(),
            uncertainties: uncertainties.to_vec(),
        }
    }

    /// A spoke of `n` samples whose travel time grows linearly with radius.
    ///
    /// Sample `i` holds `(i + 1) * sec_per_sample` and uncertainty `uncertainty`.
    pub fn linear(azimuth: f32, delta: f32, n: usize, sec_per_sample: f32, uncertainty: f32) -> Self {
        Self {
            azimuth,
            delta,
            travel_times: (1..=n).map(|i| i as f32 * sec_per_sample).collect(),
            uncertainties: vec![uncertainty; n],
        }
    }
}

enum Record {
    Spoke(SpokeSpec),
    /// A spoke header with an arbitrary count and no payload, for malformed streams.
    Header { azimuth: f32, count: i32, delta: f32 },
}

/// Encoder for the binary grid format.
///
/// # Example
///
/// ```
/// use test_utils::{GridBuilder, SpokeSpec};
///
/// let bytes = GridBuilder::new(10.0, 20.0, "SPRING")
///     .spoke(SpokeSpec::new(0.0, 1.0, &[10.0, 20.0], &[1.0, 1.0]))
///     .encode();
/// // lat + lon + label length + label + azimuth + count + delta + 2 * 2 floats
/// assert_eq!(bytes.len(), 4 + 4 + 4 + 6 + 4 + 4 + 4 + 16);
/// ```
pub struct GridBuilder {
    latitude: f32,
    longitude: f32,
    label: Vec<u8>,
    records: Vec<Record>,
}

impl GridBuilder {
    pub fn new(latitude: f32, longitude: f32, label: &str) -> Self {
        Self {
            latitude,
            longitude,
            label: label.as_bytes().to_vec(),
            records: Vec::new(),
        }
    }

    pub fn spoke(mut self, spoke: SpokeSpec) -> Self {
        self.records.push(Record::Spoke(spoke));
        self
    }

    pub fn spokes(mut self, spokes: impl IntoIterator<Item = SpokeSpec>) -> Self {
        self.records.extend(spokes.into_iter().map(Record::Spoke));
        self
    }

    /// Append a bare spoke header claiming `count` samples.
    pub fn raw_spoke_header(mut self, azimuth: f32, count: i32, delta: f32) -> Self {
        self.records.push(Record::Header {
            azimuth,
            count,
            delta,
        });
        self
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_f32(self.latitude);
        buf.put_f32(self.longitude);
        buf.put_i32(self.label.len() as i32);
        buf.put_slice(&self.label);

        for record in &self.records {
            match record {
                Record::Spoke(s) => {
                    buf.put_f32(s.azimuth);
                    buf.put_i32(s.travel_times.len() as i32);
                    buf.put_f32(s.delta);
                    s.travel_times.iter().for_each(|v| buf.put_f32(*v));
                    s.uncertainties.iter().for_each(|v| buf.put_f32(*v));
                }
                Record::Header {
                    azimuth,
                    count,
                    delta,
                } => {
                    buf.put_f32(*azimuth);
                    buf.put_i32(*count);
                    buf.put_f32(*delta);
                }
            }
        }

        buf.freeze()
    }
}

/// Four spokes at 0/90/180/270, three samples each, unit step.
///
/// Spoke `k` holds travel times `10 + k`, `20 + k`, `30 + k` and unit
/// uncertainty.
pub fn four_spoke_grid() -> GridBuilder {
    GridBuilder::new(0.0, 0.0, "TEST").spokes((0..4).map(|k| {
        let k = k as f32;
        SpokeSpec::new(
            90.0 * k,
            1.0,
            &[10.0 + k, 20.0 + k, 30.0 + k],
            &[1.0, 1.0, 1.0],
        )
    }))
}

/// Eight spokes, 45 degrees apart, radial step 10 degrees.
///
/// Spokes 0-135 hold a single sample, so anything past 10 degrees towards the
/// north-east is blocked. Spokes 180-315 hold 20 samples with travel time
/// `700 s` per sample, reaching 200 degrees.
pub fn half_blocked_grid() -> GridBuilder {
    GridBuilder::new(0.0, 0.0, "BLOCKED").spokes((0..8).map(|k| {
        let azimuth = 45.0 * k as f32;
        if k < 4 {
            SpokeSpec::linear(azimuth, 10.0, 1, 700.0, 2.0)
        } else {
            SpokeSpec::linear(azimuth, 10.0, 20, 700.0, 2.0)
        }
    }))
}

/// Three spokes 120 degrees apart; spoke 1 is two samples short of the others.
pub fn ragged_grid() -> GridBuilder {
    GridBuilder::new(0.0, 0.0, "RAGGED")
        .spoke(SpokeSpec::new(0.0, 1.0, &[10.0, 20.0, 30.0, 40.0], &[1.0, 2.0, 3.0, 4.0]))
        .spoke(SpokeSpec::new(120.0, 1.0, &[11.0, 21.0], &[1.0, 2.0]))
        .spoke(SpokeSpec::new(240.0, 1.0, &[12.0, 22.0, 32.0, 42.0], &[3.0, 4.0, 5.0, 6.0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;

    #[test]
    fn test_header_layout() {
        let mut bytes = GridBuilder::new(1.5, -2.5, "AB").encode();
        assert_eq!(bytes.len(), 14);
        assert_eq!(bytes.get_f32(), 1.5);
        assert_eq!(bytes.get_f32(), -2.5);
        assert_eq!(bytes.get_i32(), 2);
        assert_eq!(&bytes[..], b"AB");
    }

    #[test]
    fn test_spoke_layout() {
        let mut bytes = GridBuilder::new(0.0, 0.0, "")
            .spoke(SpokeSpec::new(90.0, 0.5, &[7.0], &[3.0]))
            .encode();
        bytes.advance(12);
        assert_eq!(bytes.get_f32(), 90.0);
        assert_eq!(bytes.get_i32(), 1);
        assert_eq!(bytes.get_f32(), 0.5);
        assert_eq!(bytes.get_f32(), 7.0);
        assert_eq!(bytes.get_f32(), 3.0);
        assert!(!bytes.has_remaining());
    }

    #[test]
    fn test_linear_spoke() {
        let s = SpokeSpec::linear(0.0, 10.0, 3, 700.0, 2.0);
        assert_eq!(s.travel_times, vec![700.0, 1400.0, 2100.0]);
        assert_eq!(s.uncertainties, vec![2.0; 3]);
    }
}
