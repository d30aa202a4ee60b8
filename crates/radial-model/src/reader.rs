//! Binary radial grid reader.
//!
//! File layout (big-endian, IEEE-754 32-bit floats, 32-bit ints):
//!
//! ```text
//! f32      center latitude (deg)
//! f32      center longitude (deg)
//! i32      label length n (0 = empty, capped)
//! u8[n]    label bytes
//! repeated until end of stream:
//!   f32      azimuth (deg)
//!   i32      sample count n
//!   f32      radial step (deg)
//!   f32[n]   travel time (s)
//!   f32[n]   uncertainty (s)
//! ```

use bytes::Buf;

use crate::error::{RadialModelError, Result};

/// One azimuth spoke exactly as stored in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpoke {
    pub azimuth: f32,
    pub delta: f32,
    pub travel_times: Vec<f32>,
    pub uncertainties: Vec<f32>,
}

/// A parsed grid file before any policy-specific processing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGrid {
    pub latitude: f32,
    pub longitude: f32,
    pub period: String,
    pub spokes: Vec<RawSpoke>,
}

fn ensure<B: Buf>(buf: &B, needed: usize, what: &str) -> Result<()> {
    if buf.remaining() < needed {
        return Err(RadialModelError::truncated(format!(
            "{} needs {} bytes, {} remain",
            what,
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

fn read_f32<B: Buf>(buf: &mut B, what: &str) -> Result<f32> {
    ensure(buf, 4, what)?;
    Ok(buf.get_f32())
}

fn read_i32<B: Buf>(buf: &mut B, what: &str) -> Result<i32> {
    ensure(buf, 4, what)?;
    Ok(buf.get_i32())
}

fn read_floats<B: Buf>(buf: &mut B, n: usize, what: &str) -> Result<Vec<f32>> {
    ensure(buf, n.saturating_mul(4), what)?;
    Ok((0..n).map(|_| buf.get_f32()).collect())
}

/// Read a length-prefixed label, failing if it is longer than `max_len`.
fn read_label<B: Buf>(buf: &mut B, max_len: usize) -> Result<String> {
    let n = read_i32(buf, "label length")?;
    if n == 0 {
        return Ok(String::new());
    }
    if n < 0 {
        return Err(RadialModelError::NegativeLength {
            field: "label",
            len: n,
        });
    }
    let n = n as usize;
    if n > max_len {
        return Err(RadialModelError::LabelTooLong { len: n, max: max_len });
    }
    ensure(buf, n, "label")?;
    let bytes = buf.copy_to_bytes(n);
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn read_spoke<B: Buf>(buf: &mut B, index: usize) -> Result<RawSpoke> {
    let azimuth = read_f32(buf, "spoke azimuth")?;
    let n = read_i32(buf, "spoke sample count")?;
    if n < 0 {
        return Err(RadialModelError::NegativeLength {
            field: "spoke sample",
            len: n,
        });
    }
    let delta = read_f32(buf, "spoke radial step")?;
    let n = n as usize;
    let travel_times = read_floats(buf, n, &format!("travel times of spoke {}", index))?;
    let uncertainties = read_floats(buf, n, &format!("uncertainties of spoke {}", index))?;
    Ok(RawSpoke {
        azimuth,
        delta,
        travel_times,
        uncertainties,
    })
}

/// Parse a complete grid from `buf`, consuming it to the end.
pub fn parse_grid<B: Buf>(mut buf: B, max_label_len: usize) -> Result<RawGrid> {
    let latitude = read_f32(&mut buf, "center latitude")?;
    let longitude = read_f32(&mut buf, "center longitude")?;
    let period = read_label(&mut buf, max_label_len)?;

    let mut spokes = Vec::new();
    while buf.has_remaining() {
        spokes.push(read_spoke(&mut buf, spokes.len())?);
    }

    Ok(RawGrid {
        latitude,
        longitude,
        period,
        spokes,
    })
}
