//! Great-circle operations on earth-centered unit vectors.

use nalgebra::Vector3;
use std::f64::consts::TAU;

/// Earth-centered unit vector: x toward (0N, 0E), y toward (0N, 90E), z toward the north pole.
pub type UnitVector = Vector3<f64>;

const DEGENERATE: f64 = 1e-15;

/// Angular distance between two unit vectors in radians, in `[0, PI]`.
pub fn angle(u: &UnitVector, v: &UnitVector) -> f64 {
    u.cross(v).norm().atan2(u.dot(v))
}

/// Angular distance between two unit vectors in degrees.
pub fn angle_degrees(u: &UnitVector, v: &UnitVector) -> f64 {
    angle(u, v).to_degrees()
}

/// Local east and north directions at `u`.
///
/// At the poles east is undefined; `None` is returned.
fn local_frame(u: &UnitVector) -> Option<(UnitVector, UnitVector)> {
    let east = Vector3::new(-u.y, u.x, 0.0);
    let norm = east.norm();
    if norm < DEGENERATE {
        return None;
    }
    let east = east / norm;
    let north = u.cross(&east);
    Some((east, north))
}

/// Azimuth from `u` to `v` in radians, clockwise from north, in `[0, 2*PI)`.
///
/// Returns `error_value` when `u` is a pole or when `v` coincides with `u` or
/// its antipode.
pub fn azimuth(u: &UnitVector, v: &UnitVector, error_value: f64) -> f64 {
    let Some((east, north)) = local_frame(u) else {
        return error_value;
    };
    let tangent = v - u * u.dot(v);
    if tangent.norm() < DEGENERATE {
        return error_value;
    }
    let az = tangent.dot(&east).atan2(tangent.dot(&north));
    if az < 0.0 {
        az + TAU
    } else {
        az
    }
}

/// Azimuth from `u` to `v` in degrees, in `[0, 360)`, or `error_value`.
pub fn azimuth_degrees(u: &UnitVector, v: &UnitVector, error_value: f64) -> f64 {
    let az = azimuth(u, v, f64::NAN);
    if az.is_nan() {
        error_value
    } else {
        az.to_degrees()
    }
}

/// Move from `u` a great-circle `distance` along `azimuth`, both in radians.
pub fn move_along(u: &UnitVector, distance: f64, azimuth: f64) -> UnitVector {
    // at a pole every direction is south (or north); measure azimuth from the 0E meridian
    let (east, north) = local_frame(u).unwrap_or_else(|| {
        let east = Vector3::new(0.0, 1.0, 0.0);
        (east, u.cross(&east))
    });
    let direction = north * azimuth.cos() + east * azimuth.sin();
    (u * distance.cos() + direction * distance.sin()).normalize()
}

/// Degree flavour of [`move_along`].
pub fn move_along_degrees(u: &UnitVector, distance: f64, azimuth: f64) -> UnitVector {
    move_along(u, distance.to_radians(), azimuth.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EarthShape;

    fn sphere(lat: f64, lon: f64) -> UnitVector {
        EarthShape::Sphere.vector_degrees(lat, lon)
    }

    #[test]
    fn test_angle_quarter_circle() {
        let a = sphere(0.0, 0.0);
        let b = sphere(0.0, 90.0);
        assert!((angle_degrees(&a, &b) - 90.0).abs() < 1e-12);
        assert!((angle_degrees(&a, &a)).abs() < 1e-12);
    }

    #[test]
    fn test_cardinal_azimuths() {
        let origin = sphere(0.0, 0.0);
        let north = azimuth_degrees(&origin, &sphere(10.0, 0.0), -1.0);
        let east = azimuth_degrees(&origin, &sphere(0.0, 10.0), -1.0);
        let south = azimuth_degrees(&origin, &sphere(-10.0, 0.0), -1.0);
        let west = azimuth_degrees(&origin, &sphere(0.0, -10.0), -1.0);
        assert!(north.abs() < 1e-9);
        assert!((east - 90.0).abs() < 1e-9);
        assert!((south - 180.0).abs() < 1e-9);
        assert!((west - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_azimuth() {
        let origin = sphere(0.0, 0.0);
        assert_eq!(azimuth_degrees(&origin, &origin, -1.0), -1.0);
        let pole = sphere(90.0, 0.0);
        assert_eq!(azimuth_degrees(&pole, &origin, 7.0), 7.0);
    }

    #[test]
    fn test_move_then_measure() {
        let start = EarthShape::Wgs84.vector_degrees(21.3, -157.9);
        for az in [0.0, 37.0, 90.0, 181.0, 300.0] {
            let end = move_along_degrees(&start, 12.5, az);
            assert!((angle_degrees(&start, &end) - 12.5).abs() < 1e-9);
            let back = azimuth_degrees(&start, &end, f64::NAN);
            assert!((back - az).abs() < 1e-7, "az {} -> {}", az, back);
        }
    }
}
