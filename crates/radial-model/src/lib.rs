//! Station-centered azimuth/radius travel-time grids.
//!
//! A grid holds, for one receiving station, travel time and uncertainty
//! samples along a fan of azimuth "spokes". Queries blend the four samples
//! around the source position and fall back to the antipodal path when the
//! direct one is blocked.
//!
//! # Architecture
//!
//! ```text
//! grid file (big-endian)
//!      │
//!      ▼
//! reader::parse_grid ──► RawGrid
//!      │
//!      ├─► LegacyGrid    ragged spokes, per-spoke step, 75 s/deg extrapolation
//!      │
//!      └─► ImprovedGrid  uniform spacing, zero origin, hole filling
//!               │
//!               ▼
//!        RadialGridModel::interpolate(distance, azimuth)
//!               │
//!               ├─► Stencil (2 spokes x 2 radii) ──► Interpolation
//!               │
//!               └─► blocked? retry (360 - distance, azimuth + 180)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use radial_model::{ModelConfig, RadialGridModel, InterpolationPolicy};
//!
//! let config = ModelConfig::with_policy(InterpolationPolicy::Legacy);
//! let model = RadialGridModel::open("grids/WINTER/H08S1", &config)?;
//! let result = model.interpolate_lat_lon(-20.0, 80.0);
//! if let Some(tt) = result.travel_time {
//!     println!("{} s", tt);
//! }
//! ```

pub mod config;
pub mod derivs;
pub mod error;
pub mod kernel;
pub mod model;
pub mod numerics;
pub mod reader;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{ModelConfig, DEFAULT_MAX_LABEL_LEN, HYDRO_SEC_PER_DEG};
pub use derivs::{DerivativeSample, RadialDerivatives};
pub use error::{RadialModelError, Result};
pub use kernel::{GridKernel, ImprovedGrid, LegacyGrid};
pub use model::RadialGridModel;
pub use numerics::{Bracket, CubicSpline};
pub use reader::{parse_grid, RawGrid, RawSpoke};
pub use types::{Interpolation, InterpolationPolicy, Phase};
