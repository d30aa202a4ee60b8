//! One-dimensional numerical primitives.

pub mod bracket;
pub mod spline;

pub use bracket::Bracket;
pub use spline::{CubicSpline, SplinePoint};
