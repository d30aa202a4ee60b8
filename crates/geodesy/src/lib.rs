//! Earth-centered unit vectors and great-circle geometry.
//!
//! Geographic latitudes are converted to geocentric ones through an
//! [`EarthShape`] before a point becomes a unit vector, so every angular
//! distance and azimuth computed here is measured on the sphere of directions.

pub mod ellipsoid;
pub mod vector;

pub use ellipsoid::EarthShape;
pub use vector::{
    angle, angle_degrees, azimuth, azimuth_degrees, move_along, move_along_degrees, UnitVector,
};
