//! Directory-backed library of radial travel-time grids.
//!
//! A library directory holds one grid per station per season:
//!
//! ```text
//! <root>/stations.txt | stations | infra_stas   station names, one per line
//! <root>/time_guide.txt | time_guide             bias, then "SEASON end_day" lines
//! <root>/<SEASON>/<station>                      binary grid file
//! ```
//!
//! [`RadialModelLibrary::open`] returns one shared instance per directory.
//! Grid files are parsed on first use, once per canonical file, so station
//! names that are symbolic links to the same file share a model.
//!
//! # Example
//!
//! ```ignore
//! use radial_library::{RadialModelLibrary, HydroPredictor, PredictionRequest};
//! use radial_model::{ModelConfig, Phase};
//!
//! let library = RadialModelLibrary::open("/data/hydro", &ModelConfig::default())?;
//! let predictor = HydroPredictor::new(library);
//! let prediction = predictor.predict(&PredictionRequest {
//!     station: "H08S1".into(),
//!     time: chrono::Utc::now(),
//!     source_lat: -30.0,
//!     source_lon: 60.0,
//!     phase: Phase::H,
//! })?;
//! ```

pub mod catalog;
pub mod error;
pub mod library;
pub mod predictor;
pub mod registry;
pub mod stations;
pub mod time_guide;

// Re-export commonly used types at crate root
pub use catalog::LibraryStats;
pub use error::{LibraryError, Result};
pub use library::RadialModelLibrary;
pub use predictor::{HydroPredictor, Prediction, PredictionRequest, RayType};
pub use registry::open_libraries;
pub use stations::STATION_FILES;
pub use time_guide::{common_day_of_year, Season, TimeGuide, TIME_GUIDE_FILES};
