//! Reference ellipsoids and geographic <-> geocentric latitude conversion.

use crate::vector::UnitVector;

/// Shape of the Earth used when turning latitude/longitude into unit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EarthShape {
    /// WGS84 ellipsoid, inverse flattening 298.257223563.
    #[default]
    Wgs84,
    /// A perfect sphere; geographic and geocentric latitudes coincide.
    Sphere,
}

impl EarthShape {
    /// Equatorial radius in km.
    pub fn equatorial_radius_km(&self) -> f64 {
        match self {
            Self::Wgs84 => 6378.137,
            Self::Sphere => 6371.0,
        }
    }

    /// Inverse flattening, infinite for the sphere.
    pub fn inverse_flattening(&self) -> f64 {
        match self {
            Self::Wgs84 => 298.257223563,
            Self::Sphere => f64::INFINITY,
        }
    }

    /// Eccentricity squared, `f * (2 - f)`.
    pub fn e2(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening();
        f * (2.0 - f)
    }

    /// Convert a geographic latitude (radians) to geocentric latitude (radians).
    pub fn geocentric_lat(&self, geographic_lat: f64) -> f64 {
        let e2 = self.e2();
        if e2 == 0.0 {
            geographic_lat
        } else {
            (geographic_lat.tan() * (1.0 - e2)).atan()
        }
    }

    /// Convert a geocentric latitude (radians) to geographic latitude (radians).
    pub fn geographic_lat(&self, geocentric_lat: f64) -> f64 {
        let e2 = self.e2();
        if e2 == 0.0 {
            geocentric_lat
        } else {
            (geocentric_lat.tan() / (1.0 - e2)).atan()
        }
    }

    /// Unit vector of a point given geographic latitude and longitude in radians.
    pub fn vector(&self, lat: f64, lon: f64) -> UnitVector {
        let lat = self.geocentric_lat(lat);
        let cos_lat = lat.cos();
        UnitVector::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    /// Unit vector of a point given geographic latitude and longitude in degrees.
    pub fn vector_degrees(&self, lat: f64, lon: f64) -> UnitVector {
        self.vector(lat.to_radians(), lon.to_radians())
    }

    /// Geographic latitude of `v` in radians.
    pub fn lat(&self, v: &UnitVector) -> f64 {
        self.geographic_lat(v.z.clamp(-1.0, 1.0).asin())
    }

    /// Geographic latitude of `v` in degrees.
    pub fn lat_degrees(&self, v: &UnitVector) -> f64 {
        self.lat(v).to_degrees()
    }

    /// Longitude of `v` in radians, in `[-PI, PI]`.
    pub fn lon(&self, v: &UnitVector) -> f64 {
        v.y.atan2(v.x)
    }

    /// Longitude of `v` in degrees, in `[-180, 180]`.
    pub fn lon_degrees(&self, v: &UnitVector) -> f64 {
        self.lon(v).to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_round_trip() {
        let shape = EarthShape::Wgs84;
        for lat in [-89.0, -45.0, -10.5, 0.0, 12.25, 60.0, 89.5] {
            let v = shape.vector_degrees(lat, 33.0);
            assert!((shape.lat_degrees(&v) - lat).abs() < 1e-9, "lat {}", lat);
            assert!((shape.lon_degrees(&v) - 33.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_geocentric_latitude_is_smaller() {
        let shape = EarthShape::Wgs84;
        let geographic = 45.0_f64.to_radians();
        let geocentric = shape.geocentric_lat(geographic);
        assert!(geocentric < geographic);
        // about 0.19 degrees at mid latitudes
        assert!(((geographic - geocentric).to_degrees() - 0.192).abs() < 0.01);
    }

    #[test]
    fn test_sphere_is_identity() {
        let shape = EarthShape::Sphere;
        assert_eq!(shape.e2(), 0.0);
        assert_eq!(shape.geocentric_lat(0.7), 0.7);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let v = EarthShape::Wgs84.vector_degrees(-33.9, 151.2);
        assert!((v.norm() - 1.0).abs() < 1e-12);
    }
}
